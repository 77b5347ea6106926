//! Typed profile document: the seven categories the assistant answers about.
//!
//! The shape of every category is checked once, when the document is
//! deserialized. Formatters downstream can assume well-typed entries instead
//! of re-validating at render time.

use serde::{Deserialize, Serialize};

/// A single position in the work history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub duration: String,
    pub location: String,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
}

/// A named group of related skills (e.g. "automation", "programming").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillGroup {
    /// Stable group key used in queries and search tagging.
    pub key: String,
    /// Human-readable label shown in responses.
    pub label: String,
    #[serde(default)]
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub impact: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwardEntry {
    pub title: String,
    pub organization: String,
    pub year: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificationEntry {
    pub name: String,
    pub issuer: String,
    pub year: String,
    #[serde(default)]
    pub description: String,
}

/// Ways to reach the person. Absent fields are simply not rendered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactCard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalSummary {
    pub name: String,
    pub role: String,
    pub company: String,
    pub summary: String,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub location: String,
}

/// The full knowledge document about one person. Immutable for the session
/// once handed to the knowledge base.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub skills: Vec<SkillGroup>,
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
    #[serde(default)]
    pub awards: Vec<AwardEntry>,
    #[serde(default)]
    pub certifications: Vec<CertificationEntry>,
    #[serde(default)]
    pub contact: ContactCard,
    pub personal: PersonalSummary,
}

impl Profile {
    /// Bundled demo profile. The gateway falls back to this when no profile
    /// document is configured, and tests build fixtures from it.
    pub fn demo() -> Self {
        Self {
            experience: vec![
                ExperienceEntry {
                    title: "Senior QA Automation Engineer".to_string(),
                    company: "Brightline Systems".to_string(),
                    duration: "2021 – present".to_string(),
                    location: "Austin, TX".to_string(),
                    responsibilities: vec![
                        "Built the end-to-end regression suite for the payments platform".to_string(),
                        "Cut release verification time from two days to four hours".to_string(),
                        "Mentored three junior engineers on test architecture".to_string(),
                        "Introduced contract testing between service teams".to_string(),
                    ],
                    technologies: vec![
                        "Selenium".to_string(),
                        "Playwright".to_string(),
                        "Jenkins".to_string(),
                    ],
                },
                ExperienceEntry {
                    title: "QA Engineer".to_string(),
                    company: "Harbor Analytics".to_string(),
                    duration: "2018 – 2021".to_string(),
                    location: "Remote".to_string(),
                    responsibilities: vec![
                        "Owned API test coverage for the reporting pipeline".to_string(),
                        "Automated nightly data-integrity checks".to_string(),
                    ],
                    technologies: vec!["Cypress".to_string(), "Postman".to_string()],
                },
            ],
            skills: vec![
                SkillGroup {
                    key: "automation".to_string(),
                    label: "Test Automation".to_string(),
                    items: vec![
                        "Selenium".to_string(),
                        "Playwright".to_string(),
                        "Cypress".to_string(),
                        "Appium".to_string(),
                    ],
                },
                SkillGroup {
                    key: "programming".to_string(),
                    label: "Programming".to_string(),
                    items: vec![
                        "Python".to_string(),
                        "JavaScript".to_string(),
                        "SQL".to_string(),
                    ],
                },
                SkillGroup {
                    key: "testing".to_string(),
                    label: "Testing Practice".to_string(),
                    items: vec![
                        "API testing".to_string(),
                        "Performance testing".to_string(),
                        "Accessibility testing".to_string(),
                    ],
                },
            ],
            projects: vec![
                ProjectEntry {
                    name: "Release Radar".to_string(),
                    description: "Dashboard that tracks flaky tests across CI pipelines".to_string(),
                    technologies: vec!["Python".to_string(), "Grafana".to_string()],
                    impact: "Flaky-test rate dropped 60% in two quarters".to_string(),
                },
                ProjectEntry {
                    name: "Synthetic Checkout Monitor".to_string(),
                    description: "Hourly synthetic purchase flow against production".to_string(),
                    technologies: vec!["Playwright".to_string(), "AWS Lambda".to_string()],
                    impact: "Caught three checkout outages before customers reported them".to_string(),
                },
            ],
            awards: vec![AwardEntry {
                title: "Quality Champion".to_string(),
                organization: "Brightline Systems".to_string(),
                year: "2023".to_string(),
                description: "Company-wide award for the regression suite overhaul".to_string(),
            }],
            certifications: vec![
                CertificationEntry {
                    name: "ISTQB Advanced Test Automation Engineer".to_string(),
                    issuer: "ISTQB".to_string(),
                    year: "2022".to_string(),
                    description: String::new(),
                },
                CertificationEntry {
                    name: "AWS Certified Developer – Associate".to_string(),
                    issuer: "Amazon Web Services".to_string(),
                    year: "2021".to_string(),
                    description: String::new(),
                },
            ],
            contact: ContactCard {
                email: Some("jordan.reyes@example.com".to_string()),
                linkedin: Some("linkedin.com/in/jordanreyes-qa".to_string()),
                github: Some("github.com/jreyes-qa".to_string()),
                location: Some("Austin, TX".to_string()),
            },
            personal: PersonalSummary {
                name: "Jordan Reyes".to_string(),
                role: "Senior QA Automation Engineer".to_string(),
                company: "Brightline Systems".to_string(),
                summary: "Quality engineer focused on fast, trustworthy release pipelines"
                    .to_string(),
                highlights: vec![
                    "7+ years in test automation".to_string(),
                    "Speaker at TestBash Austin 2024".to_string(),
                ],
                location: "Austin, TX".to_string(),
            },
        }
    }
}

/// The seven fixed profile categories, in scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Experience,
    Skills,
    Projects,
    Awards,
    Certifications,
    Contact,
    Personal,
}

impl Category {
    /// Stable key used for lookups and search tagging.
    #[inline]
    pub fn key(&self) -> &'static str {
        match self {
            Self::Experience => "experience",
            Self::Skills => "skills",
            Self::Projects => "projects",
            Self::Awards => "awards",
            Self::Certifications => "certifications",
            Self::Contact => "contact",
            Self::Personal => "personal",
        }
    }

    /// Case-insensitive lookup. Returns `None` for unknown or empty names.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "experience" => Some(Self::Experience),
            "skills" => Some(Self::Skills),
            "projects" => Some(Self::Projects),
            "awards" => Some(Self::Awards),
            "certifications" => Some(Self::Certifications),
            "contact" => Some(Self::Contact),
            "personal" => Some(Self::Personal),
            _ => None,
        }
    }

    /// All categories in scan order.
    pub fn all() -> [Self; 7] {
        [
            Self::Experience,
            Self::Skills,
            Self::Projects,
            Self::Awards,
            Self::Certifications,
            Self::Contact,
            Self::Personal,
        ]
    }
}
