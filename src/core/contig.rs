/// A single assembled contig read from a FASTA file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contig {
    /// Record name (header text up to the first whitespace)
    pub name: String,

    /// Raw sequence bytes, line breaks removed
    pub sequence: Vec<u8>,
}

impl Contig {
    pub fn new(name: impl Into<String>, sequence: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            sequence: sequence.into(),
        }
    }

    #[must_use]
    pub fn length(&self) -> usize {
        self.sequence.len()
    }
}
