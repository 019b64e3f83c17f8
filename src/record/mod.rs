mod vcf;

pub use vcf::VcfRecord;

/// Read access to the fixed columns, INFO and per-sample FORMAT data of a
/// variant record.
pub trait Record {
    fn chrom(&self) -> &str;

    fn pos(&self) -> u64;

    fn id(&self) -> &str;

    fn ref_allele(&self) -> &str;

    fn alt_alleles(&self) -> &[String];

    fn qual(&self) -> Option<f32>;

    fn filters(&self) -> Vec<&str>;

    fn info(&self, tag: &str) -> Option<&[String]>;

    fn format(&self, tag: &str) -> Option<Vec<Option<&[String]>>>;

    fn has_flag(&self, tag: &str) -> bool {
        self.info(tag).is_some()
    }
}
