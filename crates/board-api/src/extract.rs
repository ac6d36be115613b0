//! Body field extraction shared by the board routes.
//!
//! Clients post either JSON or urlencoded forms. Both collapse into one flat
//! map of text values; presence checks happen afterwards so a missing body
//! and a missing field produce the same rejection. An empty JSON body, or
//! one that is not an object, carries no fields.

use std::collections::HashMap;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::header,
    response::{IntoResponse, Response},
    Form, Json,
};
use serde_json::{Map, Value};

use crate::error::{BoardError, BoardResult};

#[derive(Debug, Default, Clone)]
pub struct Fields(HashMap<String, String>);

impl Fields {
    /// Field value, `None` when absent or empty.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// All of `names`, in order, or [`BoardError::MissingFields`] if any is
    /// absent.
    pub fn require<const N: usize>(&self, names: [&str; N]) -> BoardResult<[&str; N]> {
        let mut values = [""; N];
        for (slot, name) in values.iter_mut().zip(names) {
            *slot = self.get(name).ok_or(BoardError::MissingFields)?;
        }
        Ok(values)
    }

    fn from_json(object: Map<String, Value>) -> Self {
        let fields = object
            .into_iter()
            .filter_map(|(name, value)| {
                let text = match value {
                    Value::Null => return None,
                    Value::String(text) => text,
                    other => other.to_string(),
                };
                Some((name, text))
            })
            .collect();
        Self(fields)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[async_trait]
impl<S> FromRequest<S> for Fields
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.trim().to_ascii_lowercase())
            .unwrap_or_default();

        if content_type.starts_with("application/json") {
            let body = Bytes::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            if body.iter().all(u8::is_ascii_whitespace) {
                return Ok(Self::default());
            }

            let Json(value) =
                Json::<Value>::from_bytes(&body).map_err(IntoResponse::into_response)?;
            match value {
                Value::Object(object) => Ok(Self::from_json(object)),
                _ => Ok(Self::default()),
            }
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(fields))
        } else {
            Ok(Self::default())
        }
    }
}
