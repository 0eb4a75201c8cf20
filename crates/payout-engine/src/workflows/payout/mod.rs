mod engine;
pub mod lob;
pub mod payin;
mod record;
pub mod rules;

pub use engine::{has_override, PayoutBatch, PayoutEngine, NO_MATCH_LABEL, OVERRIDE_LABEL};
pub use lob::LineOfBusiness;
pub use payin::{classify, ClassifiedPayin, PayinCategory};
pub use record::{
    CalculatedRecord, ClassifiedRecord, FailedRecord, RawRecord, RecordError, RecordOutcome,
};
pub use rules::{PayoutFormula, RemarkBucket, Rule, RuleTable, RuleView};
