//! PGN header tags.

use std::fmt::Write as _;

/// Tags of the seven tag roster, in the order they are written.
pub const SEVEN_TAG_ROSTER: [&str; 7] = ["Event", "Site", "Date", "Round", "White", "Black", "Result"];

fn roster_default(name: &str) -> &'static str {
    match name {
        "Date" => "????.??.??",
        "Result" => "*",
        _ => "?",
    }
}

/// Header tags in the order they were read or set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags {
    pairs: Vec<(String, String)>,
}

impl Tags {
    pub fn new() -> Self {
        Tags::default()
    }

    /// Returns the value of `name`, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Sets `name`, replacing an existing value in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => self.pairs.push((name, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn event(&self) -> Option<&str> {
        self.get("Event")
    }

    pub fn site(&self) -> Option<&str> {
        self.get("Site")
    }

    pub fn date(&self) -> Option<&str> {
        self.get("Date")
    }

    pub fn round(&self) -> Option<&str> {
        self.get("Round")
    }

    pub fn white(&self) -> Option<&str> {
        self.get("White")
    }

    pub fn black(&self) -> Option<&str> {
        self.get("Black")
    }

    pub fn result(&self) -> Option<&str> {
        self.get("Result")
    }

    /// White's rating; `None` when absent or not a number.
    pub fn white_elo(&self) -> Option<u32> {
        self.get("WhiteElo")?.trim().parse().ok()
    }

    /// Black's rating; `None` when absent or not a number.
    pub fn black_elo(&self) -> Option<u32> {
        self.get("BlackElo")?.trim().parse().ok()
    }

    pub fn eco(&self) -> Option<&str> {
        self.get("ECO")
    }

    pub fn event_date(&self) -> Option<&str> {
        self.get("EventDate")
    }

    /// The starting position, when the game does not begin from the standard one.
    pub fn fen(&self) -> Option<&str> {
        self.get("FEN")
    }

    /// Renders the header block: the seven tag roster first, with `?`
    /// placeholders for missing entries, then every other tag.
    pub fn to_pgn(&self) -> String {
        let mut out = String::new();
        for name in SEVEN_TAG_ROSTER {
            let value = self.get(name).unwrap_or(roster_default(name));
            let _ = writeln!(out, "[{} \"{}\"]", name, escape(value));
        }
        for (name, value) in self.iter() {
            if !SEVEN_TAG_ROSTER.contains(&name) {
                let _ = writeln!(out, "[{} \"{}\"]", name, escape(value));
            }
        }
        out
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
