use serde::{Deserialize, Serialize};

/// Canned replies keyed by intent.
///
/// Defaults are the relay's original Indonesian texts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Replies {
    /// Sent when a message is exactly a profanity term.
    pub profanity: String,
    /// Sent when a message is exactly one of the owner's name aliases.
    pub name_mention: String,
    /// Sent for short greetings; introduces the bot.
    pub greeting: String,
    /// Sent for any media message.
    pub unsupported_media: String,
    pub poll_question: String,
    pub poll_options: Vec<String>,
    pub poll_max_answers: u32,
}

impl Default for Replies {
    fn default() -> Self {
        Self {
            profanity: "Tidak ramah, \u{2b50} 1 .".into(),
            name_mention: "Halo bang \u{1f642}.".into(),
            greeting: "Halo disana, aku adalah bot pintar yang siap menjawab pertanyaan kamu apa saja. \
                       Harap gunakan bahasa Indonesia yang baik dan benar. Saya juga bisa bahasa nasional \
                       negara lain lho seperti: Inggris, Jepang, China Mandarin, Jerman dan lainnya.\n\n \
                       *Pro TIP:* Gunakan quoted message saat membalas pesan agar bot dapat nyambung dalam obrolanmu."
                .into(),
            unsupported_media: "Saat ini bot hanya mendukung pesan teks, segala jenis pesan media tidak didukung \u{1f64f}."
                .into(),
            poll_question: "Apakah kalian suka meow?".into(),
            poll_options: vec!["Suka".into(), "Tidak Suka".into()],
            poll_max_answers: 1,
        }
    }
}
