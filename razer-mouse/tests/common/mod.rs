//! Scripted HID backend shared by the integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use razer_transport::protocol::{REPORT_ID, REPORT_SIZE};
use razer_transport::{
    FeatureDevice, FlowConfig, FlowControl, Frame, HidBackend, InterfaceInfo, Pacer, Status,
    TransportError,
};

/// One scripted device reply
#[derive(Debug, Clone, Copy)]
pub struct Reply {
    pub status: u8,
    pub value: u8,
}

impl Reply {
    pub fn ok(value: u8) -> Self {
        Self { status: 0x02, value }
    }

    pub fn busy() -> Self {
        Self {
            status: 0x01,
            value: 0,
        }
    }

    pub fn status(status: u8) -> Self {
        Self { status, value: 0 }
    }
}

#[derive(Default)]
pub struct FakeState {
    pub interfaces: Mutex<Vec<InterfaceInfo>>,
    pub replies: Mutex<VecDeque<Reply>>,
    pub requests: Mutex<Vec<Frame>>,
    pub opened_paths: Mutex<Vec<String>>,
    pub opens: AtomicUsize,
    pub closes: AtomicUsize,
    pub enumerate_fails: Mutex<bool>,
    pub open_fails: Mutex<bool>,
}

/// Backend serving a fixed interface list and a queue of replies
pub struct FakeBackend {
    pub state: Arc<FakeState>,
    usage_subdivided: bool,
}

impl FakeBackend {
    pub fn new(usage_subdivided: bool) -> Arc<Self> {
        Arc::new(Self {
            state: Arc::new(FakeState::default()),
            usage_subdivided,
        })
    }

    pub fn connect(&self, pid: u16, interface_number: i32, usage_page: u16, usage: u16, path: &str) {
        self.state.interfaces.lock().push(InterfaceInfo {
            vid: 0x1532,
            pid,
            interface_number,
            usage_page,
            usage,
            path: path.to_string(),
        });
    }

    /// Connect the standard mouse control interface
    pub fn connect_mouse(&self, pid: u16, path: &str) {
        self.connect(pid, 0, 0x01, 0x02, path);
    }

    pub fn disconnect(&self, pid: u16) {
        self.state.interfaces.lock().retain(|i| i.pid != pid);
    }

    pub fn push_replies(&self, replies: impl IntoIterator<Item = Reply>) {
        self.state.replies.lock().extend(replies);
    }

    pub fn fail_enumerate(&self, fail: bool) {
        *self.state.enumerate_fails.lock() = fail;
    }

    pub fn fail_open(&self, fail: bool) {
        *self.state.open_fails.lock() = fail;
    }

    pub fn opens(&self) -> usize {
        self.state.opens.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.state.closes.load(Ordering::SeqCst)
    }

    pub fn sends(&self) -> usize {
        self.state.requests.lock().len()
    }

    pub fn last_request(&self) -> Option<Frame> {
        self.state.requests.lock().last().cloned()
    }
}

impl HidBackend for FakeBackend {
    fn enumerate(&self, vid: u16, pid: u16) -> Result<Vec<InterfaceInfo>, TransportError> {
        if *self.state.enumerate_fails.lock() {
            return Err(TransportError::Hid("enumeration failed".to_string()));
        }
        Ok(self
            .state
            .interfaces
            .lock()
            .iter()
            .filter(|i| i.vid == vid && i.pid == pid)
            .cloned()
            .collect())
    }

    fn open(&self, path: &str) -> Result<Box<dyn FeatureDevice>, TransportError> {
        if *self.state.open_fails.lock() {
            return Err(TransportError::HidPermissionDenied(path.to_string()));
        }
        self.state.opens.fetch_add(1, Ordering::SeqCst);
        self.state.opened_paths.lock().push(path.to_string());
        Ok(Box::new(FakeDevice {
            state: Arc::clone(&self.state),
            pending: None,
        }))
    }

    fn usage_subdivided(&self) -> bool {
        self.usage_subdivided
    }
}

struct FakeDevice {
    state: Arc<FakeState>,
    pending: Option<Frame>,
}

impl FeatureDevice for FakeDevice {
    fn send_feature_report(&mut self, data: &[u8]) -> Result<usize, TransportError> {
        assert_eq!(data.len(), REPORT_SIZE);
        assert_eq!(data[0], REPORT_ID);
        let request = Frame::decode(&data[1..])?;
        self.state.requests.lock().push(request.clone());
        self.pending = Some(request);
        Ok(data.len())
    }

    fn get_feature_report(&mut self, report_id: u8, len: usize) -> Result<Vec<u8>, TransportError> {
        assert_eq!(report_id, REPORT_ID);
        let mut response = self.pending.take().expect("read before write");
        let reply = self.state.replies.lock().pop_front().unwrap_or_else(Reply::busy);
        response.status = Status::from(reply.status);
        response.arguments[1] = reply.value;
        response.seal();
        let report = response.to_report();
        Ok(report[..len].to_vec())
    }
}

impl Drop for FakeDevice {
    fn drop(&mut self) {
        self.state.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Pacer that returns immediately
pub struct NoPause;

impl Pacer for NoPause {
    fn pause(&self, _duration: Duration) {}
}

/// Flow control with the given retry budget and no real delays
pub fn instant_flow(max_tries: usize) -> FlowControl {
    FlowControl::with_pacer(
        FlowConfig {
            max_tries,
            ..FlowConfig::default()
        },
        Arc::new(NoPause),
    )
}
