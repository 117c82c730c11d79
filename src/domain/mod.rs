//! Domain logic - naming rules and build keys, independent of any network access

pub mod release;
pub mod source;
pub mod tag;
pub mod variant;

pub use release::ReleaseRecord;
pub use source::{BuildKey, SourceClassification};
pub use tag::{TagFields, TagPattern};
pub use variant::{NamingRule, Variant, VariantProfile};
