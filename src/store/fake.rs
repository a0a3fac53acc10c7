use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::store::{RemoteStore, TableQuery};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Rpc { function: String, args: Value },
    Select(TableQuery),
}

type Responder = Box<dyn Fn(&Call) -> Result<Value> + Send + Sync>;

/// Records every call and answers from a closure.
pub struct FakeStore {
    calls: Mutex<Vec<Call>>,
    responder: Responder,
}

impl FakeStore {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&Call) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            calls: Mutex::new(Vec::new()),
            responder: Box::new(responder),
        }
    }

    pub fn returning(value: Value) -> Self {
        Self::new(move |_| Ok(value.clone()))
    }

    pub fn failing(message: &str) -> Self {
        let message = message.to_string();
        Self::new(move |_| Err(remote_error(&message)))
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn answer(&self, call: Call) -> Result<Value> {
        let result = (self.responder)(&call);
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        result
    }
}

pub fn remote_error(message: &str) -> AppError {
    AppError::Remote {
        status: 400,
        code: None,
        message: message.to_string(),
    }
}

#[async_trait]
impl RemoteStore for FakeStore {
    async fn rpc(&self, function: &str, args: Value) -> Result<Value> {
        self.answer(Call::Rpc { function: function.to_string(), args })
    }

    async fn select(&self, query: &TableQuery) -> Result<Value> {
        self.answer(Call::Select(query.clone()))
    }
}
