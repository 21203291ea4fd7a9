use std::collections::HashMap;

/// Language pair the built-in word list was written for
pub const FALLBACK_SOURCE: &str = "en";
pub const FALLBACK_TARGET: &str = "pt";

const BASIC_WORDS: &[(&str, &str)] = &[
    // Greetings and courtesy
    ("hello", "olá"),
    ("goodbye", "tchau"),
    ("thank", "obrigado"),
    ("please", "por favor"),
    ("yes", "sim"),
    ("no", "não"),
    // Adjectives
    ("good", "bom"),
    ("bad", "ruim"),
    ("big", "grande"),
    ("small", "pequeno"),
    ("hot", "quente"),
    ("cold", "frio"),
    ("happy", "feliz"),
    ("sad", "triste"),
    ("beautiful", "bonito"),
    ("ugly", "feio"),
    ("easy", "fácil"),
    ("difficult", "difícil"),
    ("fast", "rápido"),
    ("slow", "devagar"),
    ("new", "novo"),
    ("old", "velho"),
    // Nouns
    ("house", "casa"),
    ("car", "carro"),
    ("water", "água"),
    ("food", "comida"),
    ("book", "livro"),
    ("time", "tempo"),
    ("day", "dia"),
    ("night", "noite"),
    ("morning", "manhã"),
    ("afternoon", "tarde"),
    ("evening", "noite"),
    ("today", "hoje"),
    ("tomorrow", "amanhã"),
    ("yesterday", "ontem"),
    ("love", "amor"),
    ("friend", "amigo"),
    ("family", "família"),
    ("work", "trabalho"),
    ("school", "escola"),
    // Verbs
    ("learn", "aprender"),
    ("study", "estudar"),
    ("read", "ler"),
    ("write", "escrever"),
    ("speak", "falar"),
    ("listen", "escutar"),
    ("understand", "entender"),
    ("know", "saber"),
    ("think", "pensar"),
    ("see", "ver"),
    ("hear", "ouvir"),
    ("eat", "comer"),
    ("drink", "beber"),
    ("sleep", "dormir"),
    ("walk", "caminhar"),
    ("run", "correr"),
    ("go", "ir"),
    ("come", "vir"),
    ("have", "ter"),
    ("want", "querer"),
    ("need", "precisar"),
    ("like", "gostar"),
    // Colors
    ("red", "vermelho"),
    ("blue", "azul"),
    ("green", "verde"),
    ("yellow", "amarelo"),
    ("black", "preto"),
    ("white", "branco"),
    // Numbers
    ("one", "um"),
    ("two", "dois"),
    ("three", "três"),
    ("four", "quatro"),
    ("five", "cinco"),
    ("six", "seis"),
    ("seven", "sete"),
    ("eight", "oito"),
    ("nine", "nove"),
    ("ten", "dez"),
];

/// Offline English -> Portuguese word list used when the remote service is unreachable
pub struct FallbackDictionary {
    words: HashMap<&'static str, &'static str>,
}

impl FallbackDictionary {
    pub fn new() -> Self {
        Self {
            words: BASIC_WORDS.iter().copied().collect(),
        }
    }

    /// Look up a single word for the given pair.
    /// The text is lowercased and trimmed first; any other pair always misses.
    pub fn lookup(&self, text: &str, from: &str, to: &str) -> Option<&'static str> {
        if from != FALLBACK_SOURCE || to != FALLBACK_TARGET {
            return None;
        }

        let clean = text.trim().to_lowercase();
        if clean.is_empty() || clean.contains(char::is_whitespace) {
            return None;
        }

        self.words.get(clean.as_str()).copied()
    }
}

impl Default for FallbackDictionary {
    fn default() -> Self {
        Self::new()
    }
}
