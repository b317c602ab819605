//! Word lists for the keyword classifier. All entries are lowercase.

/// Insults and swear words, answered with the "unfriendly" reply.
pub(super) const PROFANITY_KW: &[&str] = &[
    "kontol", "kontoll", "bangsat", "ngentod", "tod", "ngentot", "asu", "asw", "celeng", "celeh",
    "tai", "fuck", "itil", "jembut", "memek", "memekk", "memekkk", "jembutt", "jembuttt", "pekok",
    "pekokk", "pekokkk", "itill", "ngentott", "ngentottt", "kontt", "konttt", "gaberrr", "kuntul",
    "asuu", "su", "suu", "ngic", "ngiclik", "meki", "kontl", "kont", "kntl", "dick", "titit",
    "peju", "gigolo", "bacod", "tolol", "goblok", "gaber", "gaberr", "peli", "pelii", "peliii",
];

/// Ways people address the account owner.
pub(super) const NAME_KW: &[&str] = &[
    "ji", "zi", "jii", "zii", "oji", "ozi", "ozip", "ozi saputra", "ozipoetra", "bang", "cok",
    "cuk", "lur",
];

pub(super) const GREETING_KW: &[&str] = &["halo", "hai", "oy", "p", "ping", "hy", "tes", "woy"];

/// Sends the poll.
pub(super) const POLL_TRIGGER: &str = "meow";

/// Operator diagnostics, honored only in the owner's own chat.
pub(super) const STATUS_COMMAND: &str = "!status";
pub(super) const SPEEDTEST_COMMAND: &str = "!speedtest";
