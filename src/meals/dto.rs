use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A meal as listed by the backend.
///
/// Reading is lenient: the id comes from `_id`, then `id`, and an element
/// without one still parses with an empty id. Text fields that are missing or
/// not strings read as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Meal {
    pub id: String,
    #[serde(rename = "titulo")]
    pub title: Option<String>,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    pub image: Option<String>,
}

impl<'de> Deserialize<'de> for Meal {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let fields = Map::<String, Value>::deserialize(d)?;
        let first = |keys: &[&str], read: fn(&Value) -> Option<String>| {
            keys.iter().find_map(|k| fields.get(*k).and_then(read))
        };
        Ok(Meal {
            id: first(&["_id", "id"], id_text).unwrap_or_default(),
            title: first(&["titulo", "title"], text),
            description: first(&["descricao", "description"], text),
            image: first(&["image", "imagem", "imageUrl"], text),
        })
    }
}

/// JSON body for creating a meal without a photo.
#[derive(Debug, Clone, Serialize)]
pub struct NewMeal {
    pub titulo: String,
    pub descricao: String,
}

/// `GET /meals` has been seen both wrapped and bare.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum MealsPayload {
    Wrapped { meals: Vec<Meal> },
    Bare(Vec<Meal>),
}

impl MealsPayload {
    pub(crate) fn into_meals(self) -> Vec<Meal> {
        match self {
            MealsPayload::Wrapped { meals } | MealsPayload::Bare(meals) => meals,
        }
    }
}

/// Backend acknowledgment for a created meal, kept as returned.
#[derive(Debug, Clone)]
pub struct CreatedMeal {
    pub status: u16,
    pub body: Value,
}

impl CreatedMeal {
    /// The created meal, when the body (or its `meal` field) has that shape.
    pub fn meal(&self) -> Option<Meal> {
        let candidate = self.body.get("meal").unwrap_or(&self.body);
        Meal::deserialize(candidate)
            .ok()
            .filter(|meal| !meal.id.is_empty())
    }
}

fn id_text(v: &Value) -> Option<String> {
    match v {
        Value::Number(n) => Some(n.to_string()),
        other => text(other),
    }
}

fn text(v: &Value) -> Option<String> {
    v.as_str().map(str::to_string)
}
