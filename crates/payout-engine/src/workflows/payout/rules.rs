use super::lob::LineOfBusiness;
use serde::Serialize;

/// How a matched rule turns a pay-in into a payout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PayoutFormula {
    /// Payout is this value regardless of pay-in.
    Fixed(f64),
    /// Payout is `payin * ratio`.
    PercentOfPayin(f64),
    /// Payout is `payin - amount` percentage points.
    FlatSubtract(f64),
}

impl PayoutFormula {
    pub fn apply(self, payin: f64) -> f64 {
        let payout = match self {
            Self::Fixed(value) => value,
            Self::PercentOfPayin(ratio) => payin * ratio,
            Self::FlatSubtract(amount) => payin - amount,
        };
        payout.max(0.0)
    }

    /// Label reported in the "Formula Used" column.
    pub fn label(self) -> String {
        match self {
            Self::Fixed(value) => format_number(value),
            Self::PercentOfPayin(ratio) => format!("{}% of Payin", format_number(ratio * 100.0)),
            Self::FlatSubtract(amount) => format!("-{}%", format_number(amount)),
        }
    }
}

fn format_number(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded}")
    }
}

/// Qualifier that disambiguates rules sharing a line of business and segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemarkBucket {
    /// Applies when no specific bucket matched.
    Nil,
    Text(&'static str),
}

impl RemarkBucket {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Nil => "NIL",
            Self::Text(text) => text,
        }
    }

    /// Loose on purpose: OCR'd remarks are noisy, so either side may contain the other.
    pub fn matches(self, payin_category: &str, remark: &str) -> bool {
        match self {
            Self::Nil => false,
            Self::Text(text) => text.contains(payin_category) || remark.contains(text),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    pub lob: LineOfBusiness,
    pub segment: &'static str,
    pub formula: PayoutFormula,
    pub remark: RemarkBucket,
}

impl Rule {
    const fn new(
        lob: LineOfBusiness,
        segment: &'static str,
        formula: PayoutFormula,
        remark: RemarkBucket,
    ) -> Self {
        Self {
            lob,
            segment,
            formula,
            remark,
        }
    }

    /// `upper_segment` must already be uppercased.
    pub fn covers(&self, lob: LineOfBusiness, upper_segment: &str) -> bool {
        self.lob == lob && upper_segment.contains(&self.segment.to_uppercase())
    }

    pub fn view(&self) -> RuleView {
        RuleView {
            lob: self.lob.label(),
            segment: self.segment,
            payout: self.formula.label(),
            remarks: self.remark.label(),
        }
    }
}

/// Serializable row of the rule table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleView {
    #[serde(rename = "LOB")]
    pub lob: &'static str,
    #[serde(rename = "SEGMENT")]
    pub segment: &'static str,
    #[serde(rename = "PO")]
    pub payout: String,
    #[serde(rename = "REMARKS")]
    pub remarks: &'static str,
}

use LineOfBusiness::{
    Bus, CommercialVehicle, Miscellaneous, PrivateCar, Taxi, TwoWheeler,
};
use PayoutFormula::{FlatSubtract, Fixed, PercentOfPayin};
use RemarkBucket::{Nil, Text};

const CV_SEGMENT: &str = "All GVW & PCV 3W, GCV 3W";

/// Order is the tie-break: both matching passes take the first hit.
const STANDARD_RULES: [Rule; 20] = [
    Rule::new(TwoWheeler, "1+5", PercentOfPayin(0.90), Nil),
    Rule::new(TwoWheeler, "TW SAOD + COMP", PercentOfPayin(0.90), Nil),
    Rule::new(TwoWheeler, "TW TP", FlatSubtract(2.0), Text("Payin Below 20%")),
    Rule::new(TwoWheeler, "TW TP", FlatSubtract(3.0), Text("Payin 21% to 30%")),
    Rule::new(TwoWheeler, "TW TP", FlatSubtract(4.0), Text("Payin 31% to 50%")),
    Rule::new(TwoWheeler, "TW TP", FlatSubtract(5.0), Text("Payin Above 50%")),
    Rule::new(PrivateCar, "PVT CAR COMP + SAOD", PercentOfPayin(0.90), Nil),
    Rule::new(PrivateCar, "PVT CAR TP", Fixed(21.0), Nil),
    Rule::new(PrivateCar, "PVT CAR TP", Fixed(21.0), Text("Zuno - 21")),
    Rule::new(CommercialVehicle, CV_SEGMENT, FlatSubtract(2.0), Text("Payin Below 20%")),
    Rule::new(CommercialVehicle, CV_SEGMENT, FlatSubtract(3.0), Text("Payin 21% to 30%")),
    Rule::new(CommercialVehicle, CV_SEGMENT, FlatSubtract(4.0), Text("Payin 31% to 50%")),
    Rule::new(CommercialVehicle, CV_SEGMENT, FlatSubtract(5.0), Text("Payin Above 50%")),
    Rule::new(Bus, "SCHOOL BUS", PercentOfPayin(0.88), Nil),
    Rule::new(Bus, "STAFF BUS", PercentOfPayin(0.88), Nil),
    Rule::new(Taxi, "TAXI", FlatSubtract(2.0), Text("Payin Below 20%")),
    Rule::new(Taxi, "TAXI", FlatSubtract(3.0), Text("Payin 21% to 30%")),
    Rule::new(Taxi, "TAXI", FlatSubtract(4.0), Text("Payin 31% to 50%")),
    Rule::new(Taxi, "TAXI", FlatSubtract(5.0), Text("Payin Above 50%")),
    Rule::new(Miscellaneous, "Misd, Tractor", PercentOfPayin(0.88), Nil),
];

/// Immutable, ordered rule table.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    pub fn standard() -> Self {
        Self::from_rules(STANDARD_RULES.to_vec())
    }

    pub fn from_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn views(&self) -> Vec<RuleView> {
        self.rules.iter().map(Rule::view).collect()
    }

    /// Rules whose line of business and segment pattern cover the record, in table order.
    pub fn candidates(&self, lob: LineOfBusiness, upper_segment: &str) -> Vec<&Rule> {
        self.rules
            .iter()
            .filter(|rule| rule.covers(lob, upper_segment))
            .collect()
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_keeps_documented_order() {
        let table = RuleTable::standard();
        assert_eq!(table.rules().len(), 20);

        let first = table.rules()[0].view();
        assert_eq!(first.lob, "TW");
        assert_eq!(first.segment, "1+5");
        assert_eq!(first.payout, "90% of Payin");
        assert_eq!(first.remarks, "NIL");

        let last = table.rules()[19].view();
        assert_eq!(last.lob, "MISD");
        assert_eq!(last.payout, "88% of Payin");

        let pvt_tp: Vec<_> = table
            .rules()
            .iter()
            .filter(|rule| rule.segment == "PVT CAR TP")
            .map(|rule| rule.remark)
            .collect();
        assert_eq!(pvt_tp, vec![Nil, Text("Zuno - 21")]);
    }

    #[test]
    fn formulas_clamp_at_zero() {
        assert_eq!(FlatSubtract(5.0).apply(3.0), 0.0);
        assert_eq!(FlatSubtract(2.0).apply(18.0), 16.0);
        assert_eq!(Fixed(21.0).apply(80.0), 21.0);
        assert!((PercentOfPayin(0.88).apply(50.0) - 44.0).abs() < 1e-9);
    }

    #[test]
    fn formula_labels_match_rate_card_notation() {
        assert_eq!(Fixed(21.0).label(), "21");
        assert_eq!(PercentOfPayin(0.90).label(), "90% of Payin");
        assert_eq!(PercentOfPayin(0.88).label(), "88% of Payin");
        assert_eq!(FlatSubtract(3.0).label(), "-3%");
        assert_eq!(FlatSubtract(2.5).label(), "-2.5%");
    }

    #[test]
    fn remark_bucket_matches_in_both_directions() {
        let bucket = Text("Payin 21% to 30%");
        assert!(bucket.matches("21% to 30%", ""));
        assert!(!bucket.matches("Below 20%", "other make"));
        assert!(bucket.matches("Below 20%", "see Payin 21% to 30% slab"));
        assert!(!Nil.matches("Below 20%", "NIL"));
    }

    #[test]
    fn candidates_require_lob_and_segment_substring() {
        let table = RuleTable::standard();
        let upper = "TW TP - NEW".to_string();
        let hits = table.candidates(LineOfBusiness::TwoWheeler, &upper);
        assert_eq!(hits.len(), 4);
        assert_eq!(hits[0].formula, PayoutFormula::FlatSubtract(2.0));

        assert!(table
            .candidates(LineOfBusiness::PrivateCar, &upper)
            .is_empty());
    }
}
