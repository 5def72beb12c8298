//! In-memory warehouse session fakes
//!
//! Sessions record every statement plus their commit/rollback/close state
//! behind an `Arc`, so tests can inspect a session after the loader has
//! closed it. A substring trigger simulates statement failures (e.g. a
//! COPY that the warehouse rejects).

use crate::error::{Result, WarehouseError};
use crate::loader::WarehouseCredentials;
use crate::session::{WarehouseConnector, WarehouseSession};
use async_trait::async_trait;
use siloflow_core::Endpoint;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Observable state of one fake session.
#[derive(Default)]
pub struct SessionState {
    statements: Mutex<Vec<String>>,
    committed: AtomicBool,
    rolled_back: AtomicBool,
    closed: AtomicBool,
    fail_substring: Mutex<Option<String>>,
}

impl SessionState {
    pub fn statements(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }

    pub fn committed(&self) -> bool {
        self.committed.load(Ordering::SeqCst)
    }

    pub fn rolled_back(&self) -> bool {
        self.rolled_back.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

struct FakeSession {
    state: Arc<SessionState>,
}

#[async_trait]
impl WarehouseSession for FakeSession {
    async fn execute(&mut self, sql: &str) -> Result<()> {
        self.state.statements.lock().unwrap().push(sql.to_string());
        let trigger = self.state.fail_substring.lock().unwrap().clone();
        if let Some(trigger) = trigger {
            if sql.contains(&trigger) {
                return Err(WarehouseError::Sql(format!(
                    "simulated failure on statement containing '{trigger}'"
                )));
            }
        }
        Ok(())
    }

    async fn commit(&mut self) -> Result<()> {
        self.state.committed.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        self.state.rolled_back.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn close(self: Box<Self>) {
        self.state.closed.store(true, Ordering::SeqCst);
    }
}

/// Connector fake handing out recording sessions.
#[derive(Default)]
pub struct FakeConnector {
    sessions: Mutex<Vec<Arc<SessionState>>>,
    fail_substring: Mutex<Option<String>>,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every statement containing `substring` fail in sessions opened
    /// from now on.
    pub fn fail_statements_containing(&self, substring: &str) {
        *self.fail_substring.lock().unwrap() = Some(substring.to_string());
    }

    pub fn sessions(&self) -> Vec<Arc<SessionState>> {
        self.sessions.lock().unwrap().clone()
    }

    pub fn last_session(&self) -> Arc<SessionState> {
        self.sessions
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no session was opened")
    }
}

#[async_trait]
impl WarehouseConnector for FakeConnector {
    async fn connect(
        &self,
        _endpoint: &Endpoint,
        _credentials: &WarehouseCredentials,
    ) -> Result<Box<dyn WarehouseSession>> {
        let state = Arc::new(SessionState {
            fail_substring: Mutex::new(self.fail_substring.lock().unwrap().clone()),
            ..Default::default()
        });
        self.sessions.lock().unwrap().push(state.clone());
        Ok(Box::new(FakeSession { state }))
    }
}
