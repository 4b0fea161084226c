#![allow(dead_code)]

use std::{collections::HashMap, sync::Mutex};

use anyhow::anyhow;
use async_trait::async_trait;
use serde_json::Value;
use tawseek_misr::{Error, Repository, Result};

#[derive(Clone)]
pub enum Canned {
    Json(Value),
    Http(u16, &'static str),
    Transport(&'static str),
}

/// In-memory backend answering by endpoint path and recording every call.
#[derive(Default)]
pub struct FakeRepository {
    routes: Mutex<HashMap<String, Canned>>,
    calls: Mutex<Vec<(String, Option<Value>)>>,
}

impl FakeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, path: &str, response: Canned) -> Self {
        self.set(path, response);
        self
    }

    pub fn set(&self, path: &str, response: Canned) {
        self.routes
            .lock()
            .unwrap()
            .insert(path.to_string(), response);
    }

    pub fn calls_to(&self, path: &str) -> Vec<Option<Value>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| p == path)
            .map(|(_, body)| body.clone())
            .collect()
    }

    fn answer(&self, path: &str, body: Option<Value>) -> Result<Value> {
        self.calls.lock().unwrap().push((path.to_string(), body));
        let canned = self.routes.lock().unwrap().get(path).cloned();
        match canned {
            Some(Canned::Json(value)) => Ok(value),
            Some(Canned::Http(status, message)) => Err(Error::Http {
                status,
                message: message.to_string(),
            }),
            Some(Canned::Transport(message)) => Err(anyhow!(message).into()),
            None => Err(Error::Http {
                status: 404,
                message: format!("no route for {path}"),
            }),
        }
    }
}

#[async_trait]
impl Repository for FakeRepository {
    async fn get(&self, path: &str) -> Result<Value> {
        self.answer(path, None)
    }

    async fn post(&self, path: &str, body: Value, _authenticated: bool) -> Result<Value> {
        self.answer(path, Some(body))
    }
}

pub fn ok(data: Value) -> Canned {
    Canned::Json(serde_json::json!({ "statusCode": "200", "description": "", "data": data }))
}
