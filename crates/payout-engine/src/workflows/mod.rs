pub mod extraction;
pub mod payout;
pub mod pipeline;
pub mod report;
