#![allow(dead_code)]

use grove::{Entity, ValueEnum};
use time::Duration;

#[derive(ValueEnum, Default, Debug, Clone, Copy, PartialEq)]
pub enum Mood {
    #[default]
    Calm,
    Happy,
    Grumpy,
}

#[derive(Entity, Default, Debug, Clone, PartialEq)]
#[table_name("people")]
pub struct Person {
    #[grove(kind = Int12, primary_key, not_null)]
    pub id: Option<i32>,
    #[grove(kind = Varchar120, not_null)]
    pub name: String,
    #[grove(kind = Int12)]
    pub age: Option<i32>,
    #[grove(kind = Bool)]
    pub active: bool,
    #[grove(name = "mood", kind = Enum)]
    pub humor: Mood,
    #[grove(kind = Varchar60)]
    pub rest: Option<Duration>,
    #[grove(embedded_list = "person_id")]
    pub pets: Vec<Pet>,
    #[grove(embedded_table = "person_id")]
    pub passport: Option<Passport>,
    pub visits: u32,
}

#[derive(Entity, Default, Debug, Clone, PartialEq)]
#[table_name("pets")]
pub struct Pet {
    #[grove(primary_key, not_null)]
    pub id: Option<i32>,
    #[grove(kind = Int12)]
    pub person_id: Option<i32>,
    #[grove(kind = Varchar60, not_null)]
    pub name: String,
}

#[derive(Entity, Default, Debug, Clone, PartialEq)]
#[table_name("passports")]
pub struct Passport {
    #[grove(primary_key, not_null)]
    pub id: Option<i32>,
    #[grove(kind = Int12)]
    pub person_id: Option<i32>,
    #[grove(kind = Varchar60)]
    pub number: String,
}

/// Mapped columns but no table declaration.
#[derive(Entity, Default, Debug)]
pub struct Unmapped {
    #[grove(kind = Int12)]
    pub value: i32,
}

#[derive(Entity, Default, Debug)]
#[table_name]
pub struct NoPrimary {
    #[grove(kind = Varchar60)]
    pub note: String,
}

pub fn pet(name: &str) -> Pet {
    Pet {
        id: None,
        person_id: None,
        name: name.into(),
    }
}

pub fn ada() -> Person {
    Person {
        id: None,
        name: "Ada".into(),
        age: Some(36),
        active: true,
        humor: Mood::Happy,
        rest: Some(Duration::hours(1) + Duration::minutes(30)),
        pets: Vec::new(),
        passport: None,
        visits: 0,
    }
}
