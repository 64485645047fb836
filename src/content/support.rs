//! Help centre: searchable FAQ, resources, contact options and the contact form.

use super::Faq;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FaqCategory {
    pub category: &'static str,
    pub questions: &'static [Faq],
}

pub const SUPPORT_FAQS: &[FaqCategory] = &[
    FaqCategory {
        category: "Getting Started",
        questions: &[
            Faq {
                question: "How do I create my first voiceover?",
                answer: "Simply click on \"Create Voice\" from the homepage, enter your script, choose your language and voice, then click generate. Your voiceover will be ready in seconds!",
            },
            Faq {
                question: "Which Indian languages are supported?",
                answer: "We support 15+ Indian languages including Hindi, Tamil, Telugu, Gujarati, Bengali, Marathi, Kannada, Malayalam, Punjabi, Odia, Assamese, and Urdu. More languages are added regularly.",
            },
            Faq {
                question: "How accurate is the pronunciation?",
                answer: "Our AI models are specifically trained on Indian languages and achieve 99%+ accuracy in pronunciation, including proper regional accents and speech patterns.",
            },
        ],
    },
    FaqCategory {
        category: "Pricing & Plans",
        questions: &[
            Faq {
                question: "Can I try PariVaani for free?",
                answer: "Yes! Our Free plan includes 5 voiceovers per month forever. You can also try any paid plan with a 7-day free trial.",
            },
            Faq {
                question: "Can I change my plan anytime?",
                answer: "Absolutely! You can upgrade or downgrade your plan at any time. Changes take effect immediately with prorated billing.",
            },
            Faq {
                question: "Do you offer refunds?",
                answer: "Yes, we offer a 30-day money-back guarantee for all paid plans. Contact our support team for assistance.",
            },
        ],
    },
    FaqCategory {
        category: "Technical Support",
        questions: &[
            Faq {
                question: "What audio formats do you support?",
                answer: "All voiceovers are generated in high-quality MP3 format (320kbps for paid plans, 128kbps for free plan). We're working on adding more formats like WAV and FLAC.",
            },
            Faq {
                question: "Can I use the voiceovers commercially?",
                answer: "Yes, all paid plans include commercial usage rights. You can use the generated voiceovers in your business projects, YouTube videos, podcasts, and more.",
            },
            Faq {
                question: "Is there an API available?",
                answer: "API access is available for Enterprise customers. Contact our sales team to discuss your integration needs.",
            },
        ],
    },
    FaqCategory {
        category: "Account & Billing",
        questions: &[
            Faq {
                question: "How do I update my payment method?",
                answer: "Go to your Dashboard > Account Settings > Billing to update your payment method. Changes take effect immediately.",
            },
            Faq {
                question: "Can I download my previous voiceovers?",
                answer: "Yes, all your generated voiceovers are saved in your Dashboard and can be downloaded anytime. Free plan users have access for 30 days, paid users have unlimited access.",
            },
            Faq {
                question: "How do I cancel my subscription?",
                answer: "You can cancel your subscription anytime from your Dashboard > Account Settings. Your plan will remain active until the end of your billing period.",
            },
        ],
    },
];

/// A category with only the questions that matched a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaqMatch {
    pub category: &'static str,
    pub questions: Vec<Faq>,
}

/// Case-insensitive substring search over questions and answers.
///
/// A blank query matches everything. Categories left without questions are dropped.
pub fn search_faqs(query: &str) -> Vec<FaqMatch> {
    let needle = query.trim().to_lowercase();
    SUPPORT_FAQS
        .iter()
        .map(|cat| FaqMatch {
            category: cat.category,
            questions: cat
                .questions
                .iter()
                .filter(|q| {
                    needle.is_empty()
                        || q.question.to_lowercase().contains(&needle)
                        || q.answer.to_lowercase().contains(&needle)
                })
                .copied()
                .collect(),
        })
        .filter(|m| !m.questions.is_empty())
        .collect()
}

// ── Resources & contact options ──────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resource {
    pub title: &'static str,
    pub description: &'static str,
}

pub const RESOURCES: &[Resource] = &[
    Resource {
        title: "Video Tutorials",
        description: "Step-by-step video guides to get you started",
    },
    Resource {
        title: "Documentation",
        description: "Comprehensive guides and API documentation",
    },
    Resource {
        title: "Best Practices",
        description: "Tips to create better voiceovers",
    },
    Resource {
        title: "Community Forum",
        description: "Connect with other PariVaani users",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContactOption {
    pub title: &'static str,
    pub description: &'static str,
    pub contact: &'static str,
    pub response_time: &'static str,
}

pub const CONTACT_OPTIONS: &[ContactOption] = &[
    ContactOption {
        title: "Email Support",
        description: "Get help via email within 24 hours",
        contact: "support@parivaani.com",
        response_time: "Within 24 hours",
    },
    ContactOption {
        title: "Live Chat",
        description: "Chat with our support team instantly",
        contact: "Available 9 AM - 6 PM IST",
        response_time: "Instant",
    },
    ContactOption {
        title: "Phone Support",
        description: "Call us for urgent issues (Business+ plans)",
        contact: "+91-80-1234-5678",
        response_time: "Immediate",
    },
];

// ── Contact form ─────────────────────────────────────────────────

pub const CONTACT_THANKS: &str =
    "Thank you for your message! We'll get back to you within 24 hours.";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContactError {
    #[error("Please fill in the {0} field")]
    Missing(&'static str),
    #[error("Please enter a valid email address")]
    InvalidEmail,
}

impl ContactForm {
    /// Every field is required; the email needs an `@` with text on both sides.
    pub fn validate(&self) -> Result<(), ContactError> {
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("subject", &self.subject),
            ("message", &self.message),
        ] {
            if value.trim().is_empty() {
                return Err(ContactError::Missing(field));
            }
        }
        match self.email.trim().split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
            _ => Err(ContactError::InvalidEmail),
        }
    }

    /// Validate and record the message. Returns the thank-you notice.
    pub fn submit(&self) -> Result<&'static str, ContactError> {
        self.validate()?;
        tracing::info!(
            email = %self.email.trim(),
            subject = %self.subject.trim(),
            chars = self.message.chars().count(),
            "Contact form submitted"
        );
        Ok(CONTACT_THANKS)
    }
}
