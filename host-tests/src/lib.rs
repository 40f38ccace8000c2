//! Host-based tests for the ESP32 motion camera
//! These tests run on the development machine, not on the ESP32

use std::cell::Cell;
use std::collections::VecDeque;
use std::time::Duration;

use chrono::{DateTime, Utc};
use motion_core::{
    CaptureError, CaptureSource, Clock, Frame, HttpRequest, HttpResponse, Method, Transport,
    TransportError,
};

/// Camera that hands out queued frames and counts releases.
#[derive(Default)]
pub struct FrameQueue {
    frames: VecDeque<Frame>,
    pub released: usize,
}

impl FrameQueue {
    pub fn push(&mut self, frame: Frame) {
        self.frames.push_back(frame);
    }
}

impl CaptureSource for FrameQueue {
    type Frame = Frame;

    fn acquire_frame(&mut self) -> Result<Frame, CaptureError> {
        self.frames.pop_front().ok_or(CaptureError::NoFrame)
    }

    fn release_frame(&mut self, _frame: Frame) {
        self.released += 1;
    }
}

#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: Method,
    pub host: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body_len: usize,
}

impl SeenRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Answers GETs as the gateway and PUTs as object storage.
pub struct FakeCloud {
    pub gateway_bodies: VecDeque<String>,
    pub storage_status: u16,
    pub offline: bool,
    pub seen: Vec<SeenRequest>,
}

impl Default for FakeCloud {
    fn default() -> Self {
        Self {
            gateway_bodies: VecDeque::new(),
            storage_status: 200,
            offline: false,
            seen: Vec::new(),
        }
    }
}

impl FakeCloud {
    pub fn uploads(&self) -> impl Iterator<Item = &SeenRequest> {
        self.seen.iter().filter(|r| r.method == Method::Put)
    }

    pub fn heartbeats(&self) -> impl Iterator<Item = &SeenRequest> {
        self.seen.iter().filter(|r| r.method == Method::Get)
    }
}

impl Transport for FakeCloud {
    fn request(&mut self, request: &HttpRequest<'_>) -> Result<HttpResponse, TransportError> {
        self.seen.push(SeenRequest {
            method: request.method,
            host: request.host.to_string(),
            path: request.path.to_string(),
            headers: request
                .headers
                .iter()
                .map(|(n, v)| (n.to_string(), v.clone()))
                .collect(),
            body_len: request.body.len(),
        });
        if self.offline {
            return Err(TransportError::new("network unreachable"));
        }
        let (status, body) = match request.method {
            Method::Get => (200, self.gateway_bodies.pop_front().unwrap_or_else(|| "{}".to_string())),
            Method::Put => (self.storage_status, String::new()),
        };
        Ok(HttpResponse {
            status,
            body: body.into_bytes(),
        })
    }
}

/// Wall clock that moves only when the loop sleeps.
pub struct SteppedClock {
    now: Cell<DateTime<Utc>>,
}

impl SteppedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now: Cell::new(now) }
    }
}

impl Clock for SteppedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        if let Ok(step) = chrono::Duration::from_std(duration) {
            self.now.set(self.now.get() + step);
        }
    }
}
