/// Separator placed between a parent contig id and the window index.
pub const FRAGMENT_SUFFIX: &str = ".concoct_part_";

/// Identity of one window cut from a parent contig.
///
/// Encoded as `{parent}.concoct_part_{part}`. [`FragmentId::decode`] is the
/// strict inverse of the [`std::fmt::Display`] encoding; [`FragmentId::demote`]
/// additionally accepts ids that were never split and maps them to part 0.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FragmentId {
    pub parent: String,
    pub part: usize,
}

impl FragmentId {
    pub fn new(parent: impl Into<String>, part: usize) -> Self {
        Self {
            parent: parent.into(),
            part,
        }
    }

    /// Decode an id produced by the fragmenter.
    ///
    /// Returns `None` unless the id ends in the fragment suffix followed by
    /// one or more decimal digits and the parent part is non-empty.
    #[must_use]
    pub fn decode(id: &str) -> Option<Self> {
        let idx = id.rfind(FRAGMENT_SUFFIX)?;
        let (parent, rest) = id.split_at(idx);
        let digits = &rest[FRAGMENT_SUFFIX.len()..];

        if parent.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }

        let part = digits.parse().ok()?;
        Some(Self::new(parent, part))
    }

    /// Decode an id, treating anything without the fragment suffix as a
    /// whole contig with part index 0.
    #[must_use]
    pub fn demote(id: &str) -> Self {
        Self::decode(id).unwrap_or_else(|| Self::new(id, 0))
    }

    /// Parent contig id of `id`, borrowed.
    #[must_use]
    pub fn parent_of(id: &str) -> &str {
        match Self::decode(id) {
            Some(decoded) => &id[..decoded.parent.len()],
            None => id,
        }
    }
}

impl std::fmt::Display for FragmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{FRAGMENT_SUFFIX}{}", self.parent, self.part)
    }
}
