use serde::Serialize;
use sha2::{Digest, Sha256};

use super::portfolio::{ExperienceEntry, PersonalInfo, PortfolioRecord, Socials};
use super::theme::{Theme, ThemeAttributes};

const PLACEHOLDER_DESCRIPTIONS: [&str; 10] = [
    "A cutting-edge project demonstrating innovative problem-solving and clean code.",
    "An interactive web app showcasing modern UI/UX principles and responsive design.",
    "A full-stack solution integrating backend APIs with a sleek frontend experience.",
    "A creative project highlighting automation, efficiency, and real-world utility.",
    "A performance-optimized application built with best practices in mind.",
    "A learning-focused project demonstrating mastery of new technologies.",
    "An open-source inspired project designed for collaboration and scalability.",
    "A visually stunning interface combining functionality and aesthetic appeal.",
    "A data-driven solution emphasizing analytics, insights, and interactivity.",
    "A personal showcase project reflecting passion, creativity, and skill growth.",
];

/// Stable filler text for a project, chosen by hashing its name.
pub fn placeholder_description(project_name: &str) -> &'static str {
    let digest = Sha256::digest(project_name.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    let index = u64::from_be_bytes(head) % PLACEHOLDER_DESCRIPTIONS.len() as u64;
    PLACEHOLDER_DESCRIPTIONS[index as usize]
}

#[derive(Debug, Clone, Serialize)]
pub struct PublishedProject {
    pub name: String,
    pub url: String,
    pub description: &'static str,
}

/// Read-only view served at the public portfolio path.
#[derive(Debug, Clone, Serialize)]
pub struct PublishedPortfolio {
    pub personal: PersonalInfo,
    pub skills: Vec<String>,
    pub projects: Vec<PublishedProject>,
    pub experience: Vec<ExperienceEntry>,
    pub socials: Socials,
    pub theme: Theme,
    pub theme_attributes: ThemeAttributes,
    pub link: String,
}

impl From<PortfolioRecord> for PublishedPortfolio {
    fn from(r: PortfolioRecord) -> Self {
        let projects = r
            .projects
            .into_iter()
            .filter(|p| p.selected)
            .map(|p| PublishedProject {
                description: placeholder_description(&p.name),
                name: p.name,
                url: p.url,
            })
            .collect();

        Self {
            personal: r.personal,
            skills: r.skills,
            projects,
            experience: r.experience,
            socials: r.socials,
            theme: r.theme,
            theme_attributes: r.theme.attributes(),
            link: r.link,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_stable_per_name() {
        let first = placeholder_description("webminds");
        for _ in 0..5 {
            assert_eq!(placeholder_description("webminds"), first);
        }
        assert!(PLACEHOLDER_DESCRIPTIONS.contains(&first));
    }

    #[test]
    fn placeholders_spread_across_the_list() {
        let names = ["alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta"];
        let distinct: std::collections::HashSet<_> =
            names.iter().map(|n| placeholder_description(n)).collect();
        assert!(distinct.len() > 1);
    }
}
