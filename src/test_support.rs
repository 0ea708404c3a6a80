// Test helpers shared by the unit tests: a one-shot HTTP server and a
// recording privileged writer.

use crate::error::{InstallError, Result};
use crate::libs::privileged_writer::PrivilegedWriter;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use tiny_http::{Response, Server};

pub struct OneShotServer {
    /// Base URL to download from, e.g. `http://127.0.0.1:41234/epm.py`.
    pub url: String,
    handle: JoinHandle<String>,
}

impl OneShotServer {
    /// Waits for the single request and returns its URL (path and query).
    pub fn request_url(self) -> String {
        self.handle.join().expect("test server thread panicked")
    }
}

/// Answers exactly one HTTP request with the given status and body.
pub fn serve_once(status: u16, body: &'static str) -> OneShotServer {
    let server = Server::http("127.0.0.1:0").expect("bind test server");
    let addr = server
        .server_addr()
        .to_ip()
        .expect("test server listens on TCP");
    let url = format!("http://{addr}/epm.py");

    let handle = thread::spawn(move || {
        let request = server.recv().expect("receive test request");
        let request_url = request.url().to_string();
        let response = Response::from_string(body).with_status_code(status);
        request.respond(response).expect("send test response");
        request_url
    });

    OneShotServer { url, handle }
}

/// In-memory stand-in for `sudo tee` + `sudo chmod +x`.
#[derive(Default)]
pub struct RecordingWriter {
    pub writes: RefCell<Vec<(PathBuf, String)>>,
    pub fail: bool,
}

impl RecordingWriter {
    /// A writer that refuses every write, like `sudo` without a password.
    pub fn failing() -> Self {
        RecordingWriter {
            fail: true,
            ..Default::default()
        }
    }
}

impl PrivilegedWriter for RecordingWriter {
    fn write_executable(&self, path: &Path, contents: &str) -> Result<()> {
        if self.fail {
            return Err(InstallError::Privileged {
                path: path.to_path_buf(),
                reason: "sudo: a password is required".to_string(),
            });
        }
        self.writes
            .borrow_mut()
            .push((path.to_path_buf(), contents.to_string()));
        Ok(())
    }
}
