use chrono::NaiveDate;

use crate::domain::{
    Application, Award, Catalog, Config, EssayPrompt, PeerId, RecordId, Semester, Slug,
};

/// A stale revision of `excellence`, superseded by [`award_id`].
pub const STALE_EXCELLENCE: RecordId = RecordId::new(100);

const AWARDS: [&str; 8] = [
    "ean_hong",
    "ambassador",
    "giff_albright",
    "joe_conway",
    "dan_summers",
    "navy_marine",
    "excellence",
    "pledge",
];

const PROMPTS: [&str; 14] = [
    "giff_visit_review",
    "newmember_involvement_previous",
    "involvement_outside",
    "newmember_coe_friends",
    "established_coe_friends",
    "newmember_coe_community_plans",
    "newmember_plans_from_others",
    "established_your_legacy_friendship",
    "established_your_legacy_accomplishments",
    "newmember_previous_leadership",
    "established_community_leadership",
    "newmember_greek_relations_plans",
    "newmember_greek_relations_accomplishments",
    "established_greek_relations_accomplishments",
];

/// Word limit of every fixture prompt.
pub const WORD_LIMIT: u32 = 10;

pub fn slug(s: &str) -> Slug {
    Slug::try_from(s).unwrap()
}

/// Latest revision of a fixture award.
pub fn award_id(identifier: &str) -> RecordId {
    let index = AWARDS.iter().position(|a| *a == identifier).unwrap();
    RecordId::new(u32::try_from(index).unwrap() + 1)
}

/// Latest revision of a fixture prompt.
pub fn prompt_id(identifier: &str) -> RecordId {
    let index = PROMPTS.iter().position(|p| *p == identifier).unwrap();
    RecordId::new(u32::try_from(index).unwrap() + 201)
}

/// Every default award and prompt, with one superseded award revision.
pub fn catalog() -> Catalog {
    let mut awards: Vec<Award> = AWARDS
        .iter()
        .map(|identifier| Award {
            id: award_id(identifier),
            identifier: slug(identifier),
            previous_version: None,
            name: (*identifier).to_string(),
            description: String::new(),
        })
        .collect();

    awards.push(Award {
        id: STALE_EXCELLENCE,
        identifier: slug("excellence"),
        previous_version: None,
        name: "Excellence (old)".to_string(),
        description: String::new(),
    });
    awards
        .iter_mut()
        .find(|award| award.id == award_id("excellence"))
        .unwrap()
        .previous_version = Some(STALE_EXCELLENCE);

    let prompts = PROMPTS.iter().map(|identifier| EssayPrompt {
        id: prompt_id(identifier),
        identifier: slug(identifier),
        previous_version: None,
        prompt: format!("Tell us about {identifier}"),
        word_limit: WORD_LIMIT,
    });

    Catalog::new(awards, prompts).unwrap()
}

pub fn config() -> Config {
    Config::default()
}

pub fn semester(s: &str) -> Semester {
    s.parse().unwrap()
}

/// A draft due in Spring 2017 with nothing filled in.
pub fn application() -> Application {
    Application::new(
        PeerId::new(1),
        NaiveDate::from_ymd_opt(2017, 2, 15).unwrap(),
    )
}

/// A draft due in Fall 2016 with nothing filled in.
pub fn fall_application() -> Application {
    Application::new(
        PeerId::new(1),
        NaiveDate::from_ymd_opt(2016, 11, 15).unwrap(),
    )
}

/// Words of filler text.
pub fn words(count: usize) -> String {
    vec!["word"; count].join(" ")
}
