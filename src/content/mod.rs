//! Static site content: landing copy, pricing plans and the help centre.

pub mod landing;
pub mod pricing;
pub mod support;

pub use pricing::{find_plan, Plan, PricingPage, PLANS, PRICING_FAQS};
pub use support::{
    search_faqs, ContactError, ContactForm, FaqMatch, CONTACT_OPTIONS, CONTACT_THANKS, RESOURCES,
};

use serde::Serialize;

/// One question and its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Faq {
    pub question: &'static str,
    pub answer: &'static str,
}
