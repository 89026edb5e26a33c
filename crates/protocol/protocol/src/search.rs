//! Classification of free-form search input.

/// What a search query most likely refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchQuery<'a> {
    /// A 20-byte `0x`-prefixed account address.
    Address(&'a str),
    /// A 32-byte `0x`-prefixed transaction hash.
    TransactionHash(&'a str),
    /// A decimal block number.
    BlockNumber(u64),
    /// Anything else.
    Unknown(&'a str),
}

impl<'a> SearchQuery<'a> {
    /// Classifies `query` by its shape. Surrounding whitespace is ignored.
    pub fn classify(query: &'a str) -> Self {
        let query = query.trim();
        match (query.starts_with("0x"), query.len()) {
            (true, 42) => Self::Address(query),
            (true, 66) => Self::TransactionHash(query),
            _ => query.parse().map_or(Self::Unknown(query), Self::BlockNumber),
        }
    }
}
