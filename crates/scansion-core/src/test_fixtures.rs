//! Entity fixtures shared by unit tests across the crate.

use crate::{traits::FieldValue, value::Value};
use scansion_derive::Entity;

///
/// MoneyType
/// Composite column decoded from its text form, e.g. `(30.00,USD)`.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct MoneyType {
    pub(crate) number: String,
    pub(crate) currency: String,
}

impl MoneyType {
    pub(crate) fn new(number: &str, currency: &str) -> Self {
        Self {
            number: number.to_string(),
            currency: currency.to_string(),
        }
    }
}

impl FieldValue for MoneyType {
    fn to_value(&self) -> Value {
        Value::Text(format!("({},{})", self.number, self.currency))
    }

    fn from_value(value: &Value) -> Option<Self> {
        let (number, currency) = value
            .as_text()?
            .strip_prefix('(')?
            .strip_suffix(')')?
            .split_once(',')?;

        Some(Self::new(number, currency))
    }
}

#[derive(Clone, Debug, Default, Entity, PartialEq)]
pub(crate) struct City {
    #[db = "id,pk"]
    pub(crate) id: i64,
    #[db = "name"]
    pub(crate) name: String,
    #[db = "country"]
    pub(crate) country: String,
}

#[derive(Clone, Debug, Default, Entity, PartialEq)]
pub(crate) struct Author {
    #[db = "id,pk"]
    pub(crate) id: i64,
    #[db = "name"]
    pub(crate) name: String,
    #[db = "publisher"]
    pub(crate) publisher: Option<String>,
    #[db = "hometown_id"]
    pub(crate) hometown_id: Option<i64>,
    #[db = "hometown"]
    #[relation]
    pub(crate) hometown: Option<Box<City>>,
    #[db = "books"]
    #[relation]
    pub(crate) books: Vec<Book>,

    pub(crate) notes: String,
}

#[derive(Clone, Debug, Default, Entity, PartialEq)]
pub(crate) struct Book {
    #[db = "id,pk"]
    pub(crate) id: i64,
    #[db = "author_id"]
    pub(crate) author_id: i64,
    #[db = "title"]
    pub(crate) title: String,
    #[db = "price"]
    pub(crate) price: MoneyType,
    #[db = "bookshelves"]
    #[relation]
    pub(crate) bookshelves: Vec<Bookshelf>,
}

#[derive(Clone, Debug, Default, Entity, PartialEq)]
pub(crate) struct Bookshelf {
    #[db = "id,pk"]
    pub(crate) id: i64,
    #[db = "name"]
    pub(crate) name: String,
    #[db = "books"]
    #[relation]
    pub(crate) books: Vec<Book>,
}

/// Self-referential through both relation kinds.
#[derive(Clone, Debug, Default, Entity, PartialEq)]
pub(crate) struct Person {
    #[db = "id,pk"]
    pub(crate) id: i64,
    #[db = "name"]
    pub(crate) name: String,
    #[db = "mentor"]
    #[relation]
    pub(crate) mentor: Option<Box<Person>>,
    #[db = "friends"]
    #[relation]
    pub(crate) friends: Vec<Person>,
}

#[derive(Clone, Debug, Default, Entity, PartialEq)]
pub(crate) struct NoKey {
    #[db = "name"]
    pub(crate) name: String,
}

#[derive(Clone, Debug, Default, Entity, PartialEq)]
pub(crate) struct TwoKeys {
    #[db = "a,pk"]
    pub(crate) a: i64,
    #[db = "b,pk"]
    pub(crate) b: i64,
}

#[derive(Clone, Debug, Default, Entity, PartialEq)]
pub(crate) struct Duplicated {
    #[db = "id,pk"]
    pub(crate) id: i64,
    #[db = "name"]
    pub(crate) first: String,
    #[db = "name"]
    pub(crate) second: String,
}

///
/// HELPERS
///

pub(crate) fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}

/// `authors.*, scan:books, books.*, scan:hometown, cities.*`
pub(crate) fn author_book_city_columns() -> Vec<String> {
    columns(&[
        "id",
        "name",
        "publisher",
        "hometown_id",
        "scan:books",
        "id",
        "author_id",
        "title",
        "price",
        "scan:hometown",
        "id",
        "name",
        "country",
    ])
}

pub(crate) fn neal_row(book_id: i64, title: &str, price: &str) -> Vec<Value> {
    vec![
        Value::Int(1),
        Value::text("Neal Stephenson"),
        Value::text("HarperCollins"),
        Value::Null,
        Value::Int(0),
        Value::Int(book_id),
        Value::Int(1),
        Value::text(title),
        Value::text(price),
        Value::Int(0),
        Value::Null,
        Value::Null,
        Value::Null,
    ]
}

pub(crate) fn joyce_row() -> Vec<Value> {
    vec![
        Value::Int(2),
        Value::text("James Joyce"),
        Value::Null,
        Value::Int(1),
        Value::Int(0),
        Value::Int(3),
        Value::Int(2),
        Value::text("Ulysses"),
        Value::text("(25.00,GBP)"),
        Value::Int(0),
        Value::Int(1),
        Value::text("Dublin"),
        Value::text("Ireland"),
    ]
}
