//! A hand-written stand-in for generator output: typed wrappers that forward
//! every accessor to the runtime by field number.

use proto_field_store::{
    AccessMode, Builder, Extension, FieldError, FieldReader, Message, MessageType, ProtoEnum, RepeatedExtension,
};
use smol_str::SmolStr;

// ─── Generated enum ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneType {
    Mobile,
    Home,
    Work,
    Unrecognized,
}

impl ProtoEnum for PhoneType {
    const DEFAULT: Self = PhoneType::Mobile;

    fn number(self) -> i32 {
        match self {
            PhoneType::Mobile => 0,
            PhoneType::Home => 1,
            PhoneType::Work => 2,
            PhoneType::Unrecognized => -1,
        }
    }

    fn from_number(number: i32) -> Option<Self> {
        match number {
            0 => Some(PhoneType::Mobile),
            1 => Some(PhoneType::Home),
            2 => Some(PhoneType::Work),
            _ => None,
        }
    }

    fn unrecognized() -> Option<Self> {
        Some(PhoneType::Unrecognized)
    }
}

// ─── Generated message ──────────────────────────────────────────────────────

static PERSON: MessageType = MessageType::new("example.Person", 6);

const NAME: u32 = 1;
const ID: u32 = 2;
const PHONE_TYPE: u32 = 3;
const EMAILS: u32 = 4;
const SCORES: u32 = 5;

/// Declared in another file, extending `example.Person`.
static NICKNAME: Extension<SmolStr> = Extension::new(100, SmolStr::new_static(""));
static LUCKY_NUMBERS: RepeatedExtension<i32> = RepeatedExtension::new(101);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Person(Message);

impl Person {
    pub fn default_instance() -> Self {
        Person(Message::default_instance(&PERSON))
    }

    pub fn builder() -> PersonBuilder {
        PersonBuilder(Builder::new(&PERSON))
    }

    pub fn to_builder(&self) -> PersonBuilder {
        PersonBuilder(self.0.to_builder())
    }

    pub fn name(&self) -> Result<SmolStr, FieldError> {
        self.0.get_field(NAME, SmolStr::default())
    }

    pub fn has_name(&self) -> bool {
        self.0.has_field(NAME)
    }

    pub fn id(&self) -> Result<i32, FieldError> {
        self.0.get_field(ID, 0)
    }

    pub fn phone_type(&self) -> Result<PhoneType, FieldError> {
        self.0
            .get_field_for_enum(PHONE_TYPE, PhoneType::DEFAULT, PhoneType::Unrecognized)
    }

    pub fn phone_type_value(&self) -> Result<i32, FieldError> {
        self.0.get_field_for_enum_value(PHONE_TYPE, PhoneType::DEFAULT)
    }

    pub fn emails(&self) -> Result<Vec<SmolStr>, FieldError> {
        self.0.get_field_list(EMAILS).to_vec()
    }

    pub fn score(&self, subject: &str) -> Result<u32, FieldError> {
        self.0.get_or_default(SCORES, subject, 0)
    }
}

pub struct PersonBuilder(Builder);

impl PersonBuilder {
    pub fn set_name(&mut self, name: &str) -> Result<&mut Self, FieldError> {
        self.0.set_field(NAME, name)?;
        Ok(self)
    }

    pub fn set_id(&mut self, id: i32) -> Result<&mut Self, FieldError> {
        self.0.set_field(ID, id)?;
        Ok(self)
    }

    pub fn set_phone_type(&mut self, value: PhoneType) -> Result<&mut Self, FieldError> {
        self.0.set_field_for_enum(PHONE_TYPE, value)?;
        Ok(self)
    }

    pub fn set_phone_type_value(&mut self, value: i32) -> Result<&mut Self, FieldError> {
        self.0.set_field_for_enum_value::<PhoneType>(PHONE_TYPE, value)?;
        Ok(self)
    }

    pub fn add_email(&mut self, email: &str) -> Result<&mut Self, FieldError> {
        self.0.add_repeated_field(EMAILS, SmolStr::from(email))?;
        Ok(self)
    }

    pub fn put_score(&mut self, subject: &str, score: u32) -> Result<&mut Self, FieldError> {
        self.0.put_map_field(SCORES, subject, score)?;
        Ok(self)
    }

    pub fn build(self) -> Person {
        Person(self.0.build())
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

fn sample() -> Person {
    let mut b = Person::builder();
    b.set_name("Ada").unwrap().set_id(7).unwrap();
    b.set_phone_type(PhoneType::Work).unwrap();
    b.add_email("ada@example.com").unwrap();
    b.add_email("ada@work.example").unwrap();
    b.put_score("math", 99).unwrap();
    b.build()
}

#[test]
fn test_generated_accessors() {
    let person = sample();
    assert!(person.has_name());
    assert_eq!(person.name().unwrap(), "Ada");
    assert_eq!(person.id().unwrap(), 7);
    assert_eq!(person.phone_type().unwrap(), PhoneType::Work);
    assert_eq!(person.emails().unwrap().len(), 2);
    assert_eq!(person.score("math").unwrap(), 99);
    assert_eq!(person.score("art").unwrap(), 0);
}

#[test]
fn test_default_instance() {
    let person = Person::default_instance();
    assert!(!person.has_name());
    assert_eq!(person.name().unwrap(), "");
    assert_eq!(person.phone_type().unwrap(), PhoneType::Mobile);
    assert!(person.emails().unwrap().is_empty());
    assert_eq!(person, Person::builder().build());
}

#[test]
fn test_unknown_enum_from_wire() {
    let mut b = Person::builder();
    b.set_phone_type_value(12).unwrap();
    let person = b.build();
    assert_eq!(person.phone_type().unwrap(), PhoneType::Unrecognized);
    assert_eq!(person.phone_type_value().unwrap(), 12);

    assert!(matches!(
        Person::builder().set_phone_type(PhoneType::Unrecognized),
        Err(FieldError::InvalidArgument { .. })
    ));
}

#[test]
fn test_to_builder_round_trip() {
    let original = sample();
    let mut b = original.to_builder();
    b.add_email("third@example.com").unwrap();
    let changed = b.build();

    assert_eq!(original.emails().unwrap().len(), 2);
    assert_eq!(changed.emails().unwrap().len(), 3);
    assert_ne!(original, changed);
    assert_eq!(original, sample());
}

#[test]
fn test_extensions_on_generated_type() {
    let mut b = Person::builder();
    b.set_name("Bob").unwrap();
    b.0.set_extension(&NICKNAME, SmolStr::from("bobby")).unwrap();
    b.0.set_repeated_extension(&LUCKY_NUMBERS, [3, 7, 13]).unwrap();
    let person = b.build();

    assert_eq!(person.0.get_extension(&NICKNAME).unwrap(), "bobby");
    assert_eq!(person.0.get_extension_list(&LUCKY_NUMBERS).unwrap(), vec![3, 7, 13]);
    assert_eq!(person.0.get_extension_count(&LUCKY_NUMBERS), 3);
    assert_eq!(person.name().unwrap(), "Bob");
}

#[test]
fn test_unchecked_mode_from_config() {
    let config = proto_field_store::RuntimeConfig::from_json(r#"{"access_mode":"unchecked"}"#).unwrap();
    let mut b = Builder::with_mode(&PERSON, config.access_mode);
    b.add_repeated_field(EMAILS, SmolStr::from("only")).unwrap();
    let message = b.build();

    assert_eq!(message.access_mode(), AccessMode::Unchecked);
    assert_eq!(message.get_repeated_field::<SmolStr>(EMAILS, 4).unwrap(), "");
}

#[test]
fn test_debug_dump_of_generated_type() {
    let dumped = proto_field_store::debug::dump(&sample().0).unwrap();
    assert_eq!(dumped["$name"], "example.Person");
    assert_eq!(dumped["1"], "Ada");
    assert_eq!(dumped["3"], 2);
    assert_eq!(dumped["4"][1], "ada@work.example");
    assert_eq!(dumped["5"]["math"], 99);
}
