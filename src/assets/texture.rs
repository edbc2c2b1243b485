use std::collections::HashMap;
use std::path::PathBuf;

use slotmap::SlotMap;
use tracing::warn;

use crate::foundation::error::{DioramaError, DioramaResult};

slotmap::new_key_type! {
    pub struct TextureId;
}

#[derive(Clone, Debug)]
pub enum TextureSource {
    /// Decode an image file from disk.
    File(PathBuf),
    /// Decode an in-memory encoded image (PNG, JPEG, ...).
    Bytes(Vec<u8>),
    /// Raw RGBA8 pixels, `width * height * 4` bytes.
    Pixels {
        width: u32,
        height: u32,
        rgba: Vec<u8>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

#[derive(Debug)]
enum TexState {
    Pending { remaining: u32 },
    Ready(TextureData),
    Failed,
}

#[derive(Debug)]
struct Entry {
    name: String,
    source: TextureSource,
    state: TexState,
    refs: u32,
}

/// Deferred texture decode with per-name caching and reference counting.
///
/// A request returns immediately; decoding happens `decode_delay` polls
/// later. Until then the texture has no data and anything using it renders
/// as visually empty but structurally valid. A failed decode is logged and
/// the texture stays empty.
#[derive(Default)]
pub struct TextureStore {
    entries: SlotMap<TextureId, Entry>,
    by_name: HashMap<String, TextureId>,
    decode_delay: u32,
}

impl TextureStore {
    pub fn new(decode_delay: u32) -> Self {
        Self {
            entries: SlotMap::with_key(),
            by_name: HashMap::new(),
            decode_delay,
        }
    }

    /// Request a texture by name. Repeated requests for the same name share
    /// one entry; each request takes a reference that must be released.
    pub fn request(&mut self, name: impl Into<String>, source: TextureSource) -> TextureId {
        let name = name.into();
        if let Some(id) = self.by_name.get(&name).copied()
            && let Some(entry) = self.entries.get_mut(id)
        {
            entry.refs += 1;
            if matches!(entry.state, TexState::Failed) {
                // A fresh request retries a failed decode.
                entry.source = source;
                entry.state = TexState::Pending {
                    remaining: self.decode_delay,
                };
            }
            return id;
        }

        let id = self.entries.insert(Entry {
            name: name.clone(),
            source,
            state: TexState::Pending {
                remaining: self.decode_delay,
            },
            refs: 1,
        });
        self.by_name.insert(name, id);
        id
    }

    /// Take an additional reference on an existing texture.
    pub fn retain(&mut self, id: TextureId) {
        if let Some(entry) = self.entries.get_mut(id) {
            entry.refs += 1;
        }
    }

    /// Drop one reference; the entry is freed when the last goes away.
    pub fn release(&mut self, id: TextureId) {
        let remove = match self.entries.get_mut(id) {
            Some(entry) => {
                entry.refs = entry.refs.saturating_sub(1);
                entry.refs == 0
            }
            None => false,
        };
        if remove && let Some(entry) = self.entries.remove(id) {
            self.by_name.remove(&entry.name);
        }
    }

    /// Advance pending decodes by one poll.
    pub fn poll(&mut self) {
        for (_, entry) in &mut self.entries {
            if let TexState::Pending { remaining } = &mut entry.state {
                if *remaining > 0 {
                    *remaining -= 1;
                    continue;
                }
                entry.state = match decode(&entry.source) {
                    Ok(data) => TexState::Ready(data),
                    Err(err) => {
                        warn!(name = %entry.name, %err, "texture decode failed");
                        TexState::Failed
                    }
                };
            }
        }
    }

    pub fn is_ready(&self, id: TextureId) -> bool {
        matches!(
            self.entries.get(id).map(|e| &e.state),
            Some(TexState::Ready(_))
        )
    }

    pub fn is_failed(&self, id: TextureId) -> bool {
        matches!(
            self.entries.get(id).map(|e| &e.state),
            Some(TexState::Failed)
        )
    }

    pub fn data(&self, id: TextureId) -> Option<&TextureData> {
        match self.entries.get(id).map(|e| &e.state) {
            Some(TexState::Ready(data)) => Some(data),
            _ => None,
        }
    }

    pub fn live_count(&self) -> usize {
        self.entries.len()
    }
}

fn decode(source: &TextureSource) -> DioramaResult<TextureData> {
    match source {
        TextureSource::File(path) => {
            let img = image::open(path)
                .map_err(|e| DioramaError::scene(format!("open '{}': {e}", path.display())))?
                .to_rgba8();
            Ok(TextureData {
                width: img.width(),
                height: img.height(),
                rgba: img.into_raw(),
            })
        }
        TextureSource::Bytes(bytes) => {
            let img = image::load_from_memory(bytes)
                .map_err(|e| DioramaError::scene(format!("decode image bytes: {e}")))?
                .to_rgba8();
            Ok(TextureData {
                width: img.width(),
                height: img.height(),
                rgba: img.into_raw(),
            })
        }
        TextureSource::Pixels {
            width,
            height,
            rgba,
        } => {
            let expected = *width as usize * *height as usize * 4;
            if rgba.len() != expected {
                return Err(DioramaError::scene(format!(
                    "pixel texture has {} bytes, expected {expected}",
                    rgba.len()
                )));
            }
            Ok(TextureData {
                width: *width,
                height: *height,
                rgba: rgba.clone(),
            })
        }
    }
}
