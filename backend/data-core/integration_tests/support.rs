use data_core::{Entity, HttpDataSource};

use serde::{Deserialize, Serialize};
use wiremock::MockServer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u32,
    pub title: String,
    pub done: bool,
}

impl Entity for Task {
    type Id = u32;

    fn table_name() -> &'static str {
        "tasks"
    }

    fn id(&self) -> &u32 {
        &self.id
    }
}

pub fn task(id: u32, title: &str, done: bool) -> Task {
    Task {
        id,
        title: title.to_string(),
        done,
    }
}

pub fn remote_for(server: &MockServer) -> HttpDataSource<Task> {
    HttpDataSource::builder(server.uri())
        .build()
        .expect("mock server URL should be valid")
}
