use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::StreamExt;
use std::fmt;
use std::path::{Path, PathBuf};
use std::thread;

use crate::error::AssetError;
use crate::scene_graph::Node;

use super::gltf::load_gltf_model;
use super::texture::{load_texture_set, TextureSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Paths are relative to the loader's asset root
#[derive(Debug, Clone, PartialEq)]
pub enum AssetRequest {
    Model { path: PathBuf, name: String },
    TextureSet { color: PathBuf, roughness: PathBuf },
}

impl AssetRequest {
    pub fn model(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self::Model {
            path: path.into(),
            name: name.into(),
        }
    }

    pub fn texture_set(color: impl Into<PathBuf>, roughness: impl Into<PathBuf>) -> Self {
        Self::TextureSet {
            color: color.into(),
            roughness: roughness.into(),
        }
    }
}

#[derive(Debug)]
pub enum AssetEvent {
    ModelLoaded { id: RequestId, name: String, model: Node },
    TextureSetLoaded { id: RequestId, set: TextureSet },
    Failed { id: RequestId, error: AssetError },
}

impl AssetEvent {
    pub fn id(&self) -> RequestId {
        match self {
            Self::ModelLoaded { id, .. } | Self::TextureSetLoaded { id, .. } | Self::Failed { id, .. } => {
                *id
            }
        }
    }
}

/// Fans asset loads out to worker threads.
///
/// Every request gets its own thread and reports exactly one event. Results
/// are collected by polling from the frame loop. Failures are logged and
/// reported once; nothing is retried or cached.
pub struct AssetLoader {
    root: PathBuf,
    sender: UnboundedSender<AssetEvent>,
    receiver: UnboundedReceiver<AssetEvent>,
    next_id: u64,
    in_flight: usize,
}

impl AssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let (sender, receiver) = mpsc::unbounded();
        Self {
            root: root.into(),
            sender,
            receiver,
            next_id: 1,
            in_flight: 0,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Requests that have not been polled yet
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn request(&mut self, request: AssetRequest) -> RequestId {
        let id = RequestId(self.next_id);
        self.next_id += 1;
        self.in_flight += 1;

        let root = self.root.clone();
        let sender = self.sender.clone();
        let spawned = thread::Builder::new()
            .name(format!("asset-loader-{}", id.0))
            .spawn(move || {
                let event = run_request(id, &root, request);
                // The receiver is gone once the loader is dropped
                let _ = sender.unbounded_send(event);
            });

        if let Err(e) = spawned {
            let error = AssetError::Spawn(e);
            log::error!("Asset request {} not started: {}", id, error);
            let _ = self.sender.unbounded_send(AssetEvent::Failed { id, error });
        }
        id
    }

    /// Drains every event that has arrived so far without blocking
    pub fn poll(&mut self) -> Vec<AssetEvent> {
        let mut events = Vec::new();
        // Empty and closed both mean nothing more to read this frame
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        self.in_flight = self.in_flight.saturating_sub(events.len());
        events
    }

    /// Blocks until the next event arrives; `None` when nothing is in flight
    pub fn poll_blocking(&mut self) -> Option<AssetEvent> {
        if self.in_flight == 0 {
            return None;
        }
        let event = futures::executor::block_on(self.receiver.next());
        if event.is_some() {
            self.in_flight -= 1;
        }
        event
    }
}

fn run_request(id: RequestId, root: &Path, request: AssetRequest) -> AssetEvent {
    match request {
        AssetRequest::Model { path, name } => {
            let full = root.join(&path);
            match load_gltf_model(&full) {
                Ok(model) => {
                    log::debug!("Loaded model {} from {:?}", name, full);
                    AssetEvent::ModelLoaded { id, name, model }
                }
                Err(e) => {
                    let error = match e.downcast::<AssetError>() {
                        Ok(error) => error,
                        Err(e) => AssetError::Model {
                            path: full,
                            reason: format!("{:#}", e),
                        },
                    };
                    log::error!("Failed to load model {}: {}", name, error);
                    AssetEvent::Failed { id, error }
                }
            }
        }
        AssetRequest::TextureSet { color, roughness } => {
            match load_texture_set(root.join(&color), root.join(&roughness)) {
                Ok(set) => {
                    log::debug!("Loaded texture set {:?}", color);
                    AssetEvent::TextureSetLoaded { id, set }
                }
                Err(error) => {
                    log::error!("Failed to load texture set {:?}: {}", color, error);
                    AssetEvent::Failed { id, error }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_assets_report_failure_once() {
        let mut loader = AssetLoader::new("no-such-asset-root");
        let model = loader.request(AssetRequest::model("lamp.glb", "lamp"));
        let textures = loader.request(AssetRequest::texture_set("c.jpg", "r.jpg"));
        assert_ne!(model, textures);
        assert_eq!(loader.in_flight(), 2);

        let mut failed = Vec::new();
        while let Some(event) = loader.poll_blocking() {
            match event {
                AssetEvent::Failed { id, .. } => failed.push(id),
                other => panic!("unexpected event {:?}", other),
            }
        }
        failed.sort();
        assert_eq!(failed, vec![model, textures]);
        assert_eq!(loader.in_flight(), 0);
        assert!(loader.poll().is_empty());
    }

    #[test]
    fn poll_does_not_block_without_requests() {
        let mut loader = AssetLoader::new(".");
        assert!(loader.poll().is_empty());
        assert!(loader.poll_blocking().is_none());
    }

    #[test]
    fn poll_drains_every_finished_request() {
        let mut loader = AssetLoader::new("no-such-asset-root");
        for i in 0..3 {
            loader.request(AssetRequest::model(format!("model-{}.glb", i), "model"));
        }

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(10);
        let mut received = 0;
        while received < 3 && std::time::Instant::now() < deadline {
            received += loader.poll().len();
            thread::sleep(std::time::Duration::from_millis(5));
        }
        assert_eq!(received, 3);
        assert_eq!(loader.in_flight(), 0);
        assert!(loader.poll().is_empty());
    }
}
