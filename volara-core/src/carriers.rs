use std::collections::HashMap;

/// Resolves a two-letter carrier code to a display name. Injectable so the
/// table can be extended or swapped without touching the normalizer.
pub trait CarrierDirectory: Send + Sync {
    /// Unknown codes pass through unchanged as the display name.
    fn display_name(&self, code: &str) -> String;
}

/// In-memory code→name table seeded with the carriers the booking site
/// actually shows.
pub struct StaticCarrierDirectory {
    names: HashMap<String, String>,
}

impl StaticCarrierDirectory {
    pub fn new() -> Self {
        let entries = [
            ("AA", "American Airlines"),
            ("DL", "Delta Air Lines"),
            ("UA", "United Airlines"),
            ("SW", "Southwest Airlines"),
            ("BA", "British Airways"),
            ("LH", "Lufthansa"),
            ("AF", "Air France"),
            ("KL", "KLM"),
            ("TK", "Turkish Airlines"),
            ("EK", "Emirates"),
            ("QR", "Qatar Airways"),
            ("SQ", "Singapore Airlines"),
        ];
        let names = entries
            .iter()
            .map(|(code, name)| (code.to_string(), name.to_string()))
            .collect();
        Self { names }
    }

    pub fn with_entry(mut self, code: &str, name: &str) -> Self {
        self.names.insert(code.to_string(), name.to_string());
        self
    }
}

impl Default for StaticCarrierDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl CarrierDirectory for StaticCarrierDirectory {
    fn display_name(&self, code: &str) -> String {
        self.names
            .get(code)
            .cloned()
            .unwrap_or_else(|| code.to_string())
    }
}
