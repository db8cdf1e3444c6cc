// Static site content served by the content endpoints

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExpertiseArea {
    pub slug: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SocialLinks {
    pub instagram: &'static str,
    pub tiktok: &'static str,
    pub linkedin: &'static str,
    pub twitter: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInfo {
    pub name: &'static str,
    pub full_name: &'static str,
    pub tagline: &'static str,
    pub description: &'static str,
    pub experience_years: u32,
    pub social: SocialLinks,
}

const fn area(slug: &'static str, name: &'static str) -> ExpertiseArea {
    ExpertiseArea { slug, name }
}

pub const EXPERTISE_AREAS: [ExpertiseArea; 15] = [
    area("acting-talent", "Acting Talent"),
    area("television", "Television"),
    area("motion-picture", "Motion Picture"),
    area("wme-independent", "WME Independent"),
    area("fashion", "Fashion"),
    area("sports", "Sports"),
    area("digital", "Digital"),
    area("theater", "Theater"),
    area("music", "Music"),
    area("comedy", "Comedy"),
    area("books-literary-media", "Books & Literary Media"),
    area("impact", "Impact, Inclusion & Advocacy"),
    area("brands", "Brands"),
    area("production", "Production"),
    area("speaking", "Speaking"),
];

pub const COMPANY_INFO: CompanyInfo = CompanyInfo {
    name: "WME",
    full_name: "William Morris Endeavor",
    tagline: "The Original Advocate For The World's Most Extraordinary Talent",
    description: "WME is the original advocate for the world's most extraordinary artists, \
                  content creators, and talent across books, digital media, fashion, film, food, \
                  music, sports, television, and theater.",
    experience_years: 125,
    social: SocialLinks {
        instagram: "https://www.instagram.com/wme/",
        tiktok: "https://www.tiktok.com/@wme",
        linkedin: "https://www.linkedin.com/company/william-morris-endeavor",
        twitter: "@wme",
    },
};
