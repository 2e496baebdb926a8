
/// A normalized variant call pulled from one data line of an input file.
/// Chromosome, position, and quality are deliberately kept as the original string tokens;
/// position is never parsed as an integer and quality may be a sentinel like ".".
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VariantRecord {
    /// Chromosome token, e.g. "chr1"
    chromosome: String,
    /// Position token, unparsed to preserve the original formatting
    position: String,
    /// Reference allele sequence
    ref_allele: String,
    /// Alternate allele sequence
    alt_allele: String,
    /// The cross-file join key, always `{chromosome}:{position}`
    variant_key: String,
    /// Number of reads supporting the alternate allele
    alt_depth: u32,
    /// Total read depth, always alternate depth + reference depth
    total_depth: u32,
    /// Quality token, passed through byte-exact
    quality: String
}

impl VariantRecord {
    /// Creates a new record from the parsed line tokens, deriving the variant key and total depth.
    /// # Arguments
    /// * `chromosome` - the chromosome token (field 0)
    /// * `position` - the position token (field 1), kept as a string
    /// * `ref_allele` - the reference allele (field 3)
    /// * `alt_allele` - the alternate allele (field 4)
    /// * `ref_depth` - reads supporting the reference allele
    /// * `alt_depth` - reads supporting the alternate allele
    /// * `quality` - the quality token (field 5), kept as a string
    pub fn new(
        chromosome: String, position: String, ref_allele: String, alt_allele: String,
        ref_depth: u32, alt_depth: u32, quality: String
    ) -> Self {
        let variant_key = Self::derive_key(&chromosome, &position);
        Self {
            chromosome,
            position,
            ref_allele,
            alt_allele,
            variant_key,
            alt_depth,
            total_depth: ref_depth + alt_depth,
            quality
        }
    }

    /// Derives the join key used to correlate the same position across files.
    /// This is a pure function of (chromosome, position) and ignores ref/alt/depth.
    pub fn derive_key(chromosome: &str, position: &str) -> String {
        format!("{chromosome}:{position}")
    }

    /// Formats the per-file support cell that ends up in the overlap table.
    pub fn support_cell(&self) -> String {
        format!("{}/{} / {}", self.alt_depth, self.total_depth, self.quality)
    }

    // getters
    pub fn chromosome(&self) -> &str {
        &self.chromosome
    }

    pub fn position(&self) -> &str {
        &self.position
    }

    pub fn ref_allele(&self) -> &str {
        &self.ref_allele
    }

    pub fn alt_allele(&self) -> &str {
        &self.alt_allele
    }

    pub fn variant_key(&self) -> &str {
        &self.variant_key
    }

    pub fn alt_depth(&self) -> u32 {
        self.alt_depth
    }

    pub fn total_depth(&self) -> u32 {
        self.total_depth
    }

    pub fn quality(&self) -> &str {
        &self.quality
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_derivation() {
        let record = VariantRecord::new(
            "chr1".to_string(), "12345".to_string(), "A".to_string(), "T".to_string(),
            10, 5, "99".to_string()
        );
        assert_eq!(record.variant_key(), "chr1:12345");
        assert_eq!(record.variant_key(), VariantRecord::derive_key("chr1", "12345"));

        // same (chromosome, position) must always produce the same key regardless of the rest
        let record2 = VariantRecord::new(
            "chr1".to_string(), "12345".to_string(), "C".to_string(), "G".to_string(),
            0, 0, ".".to_string()
        );
        assert_eq!(record.variant_key(), record2.variant_key());
    }

    #[test]
    fn test_total_depth() {
        let record = VariantRecord::new(
            "chr2".to_string(), "500".to_string(), "G".to_string(), "C".to_string(),
            12, 5, "50".to_string()
        );
        assert_eq!(record.alt_depth(), 5);
        assert_eq!(record.total_depth(), 17);
    }

    #[test]
    fn test_support_cell() {
        let record = VariantRecord::new(
            "chr1".to_string(), "100".to_string(), "A".to_string(), "T".to_string(),
            15, 5, "99".to_string()
        );
        assert_eq!(record.support_cell(), "5/20 / 99");

        // sentinel qualities must round-trip exactly
        let record = VariantRecord::new(
            "chr1".to_string(), "100".to_string(), "A".to_string(), "T".to_string(),
            0, 0, ".".to_string()
        );
        assert_eq!(record.support_cell(), "0/0 / .");
    }
}
