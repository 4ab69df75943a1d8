//! Static page content listed by the CLI.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Project {
    pub title: &'static str,
    pub description: &'static str,
    pub tags: &'static [&'static str],
    pub repo: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Certification {
    pub title: &'static str,
    pub issuer: &'static str,
    pub description: &'static str,
}

pub const PROJECTS: &[Project] = &[
    Project {
        title: "Mail Whisperer",
        description: "Automated email summarizer with TTS and NLP-based highlights",
        tags: &["Python", "Flask", "NLP"],
        repo: "https://github.com/Ajaysomala/mail-whisperer",
    },
    Project {
        title: "ATS Resume Screener",
        description: "Resume parser that scores ATS match and suggests edits",
        tags: &["Python", "NLP"],
        repo: "https://github.com/Ajaysomala/ats-resume-screener",
    },
    Project {
        title: "Web Scraper Toolkit",
        description: "Collection of scrapers for structured datasets",
        tags: &["Python", "BeautifulSoup", "Requests"],
        repo: "https://github.com/Ajaysomala",
    },
];

pub const CERTIFICATIONS: &[Certification] = &[
    Certification {
        title: "AI Data Scientist",
        issuer: "NASSCOM",
        description: "Practical AI & data projects",
    },
    Certification {
        title: "Programming for Everybody",
        issuer: "HackerRank",
        description: "Python fundamentals",
    },
    Certification {
        title: "Generative AI Introduction",
        issuer: "Microsoft",
        description: "Concepts & use-cases",
    },
];

pub fn find_project(title: &str) -> Option<&'static Project> {
    PROJECTS
        .iter()
        .find(|project| project.title.eq_ignore_ascii_case(title.trim()))
}
