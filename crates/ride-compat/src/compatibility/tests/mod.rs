mod common;
mod features;
mod rule_based;
