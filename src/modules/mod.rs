// Service integrations
pub mod integrations;
