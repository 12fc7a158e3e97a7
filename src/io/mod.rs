/// CSV export of network membership.
pub mod export;
