use inquire::Text;

use crate::errors::DnsError;

/// Where operator input comes from. Every prompt reads one line.
pub trait Prompter {
    fn text(&mut self, message: &str) -> Result<String, DnsError>;
}

pub struct InquirePrompter;

impl Prompter for InquirePrompter {
    fn text(&mut self, message: &str) -> Result<String, DnsError> {
        Ok(Text::new(message).prompt()?)
    }
}
