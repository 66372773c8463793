use derive_more::Deref;
use indexmap::IndexMap;
use winnow::ascii::multispace0;
use winnow::combinator::{delimited, preceded, repeat, separated_pair, terminated};
use winnow::token::take_till;
use winnow::{PResult, Parser};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::decode::null_terminated;
use crate::error::{Error, Result};
use crate::records::{DecodeContext, LumpObject};
use crate::registry::LumpKind;

/// One `{ "key" "value" ... }` block of the entity lump
///
/// Keys keep the order they were written in. A key written twice keeps its first position and
/// its last value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(transparent))]
pub struct Entity {
    attributes: IndexMap<String, String>,
}

impl Entity {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn class_name(&self) -> Option<&str> {
        self.get("classname")
    }

    pub fn target_name(&self) -> Option<&str> {
        self.get("targetname")
    }

    /// The `origin` key parsed as three whitespace separated numbers
    pub fn origin(&self) -> Option<[f32; 3]> {
        let mut parts = self.get("origin")?.split_whitespace().map(str::parse);
        let origin = [
            parts.next()?.ok()?,
            parts.next()?.ok()?,
            parts.next()?.ok()?,
        ];
        parts.next().is_none().then_some(origin)
    }

    /// The brush model this entity uses, from a `model` key of the form `*N`
    pub fn model_index(&self) -> Option<usize> {
        self.get("model")?.strip_prefix('*')?.parse().ok()
    }

    /// Parse every entity in an entity lump's text
    pub fn parse_all(text: &str) -> Result<Vec<Entity>> {
        entities
            .parse(text)
            .map_err(|err| Error::InvalidInput(format!("malformed entity lump: {err}")))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Entity {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            attributes: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl LumpObject for Entity {
    const NAME: &'static str = "Entity";
    const KINDS: &'static [LumpKind] = &[LumpKind::Entities];

    fn decode_lump(bytes: &[u8], _ctx: &DecodeContext<'_>) -> Result<Option<Vec<Self>>> {
        Entity::parse_all(&null_terminated(bytes)).map(Some)
    }
}

fn quoted<'s>(input: &mut &'s str) -> PResult<&'s str> {
    delimited('"', take_till(0.., '"'), '"').parse_next(input)
}

fn entity(input: &mut &str) -> PResult<Entity> {
    delimited(
        ('{', multispace0),
        repeat(
            0..,
            terminated(separated_pair(quoted, multispace0, quoted), multispace0),
        ),
        '}',
    )
    .map(|pairs: Vec<(&str, &str)>| pairs.into_iter().collect())
    .parse_next(input)
}

fn entities(input: &mut &str) -> PResult<Vec<Entity>> {
    preceded(multispace0, repeat(0.., terminated(entity, multispace0))).parse_next(input)
}
