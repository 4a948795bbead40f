use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use renderbridge_channel::{ChannelConfig, ChannelError, ReplyChannel, ReplyListener};
use renderbridge_render::{DocumentTemplate, PageState, RenderError, Renderer};
use renderbridge_transport::IpcAddress;
use tracing::{debug, info, warn};

/// Decode a state payload, render it, and compose the full document.
///
/// This is the whole per-request pipeline; the bridge loop wraps it in
/// channel I/O.
pub fn render_document<R: Renderer>(
    renderer: &R,
    template: &DocumentTemplate,
    payload: &[u8],
) -> Result<String, RenderError> {
    let state = PageState::from_slice(payload)?;
    let rendered = renderer.render(&state)?;
    Ok(template.compose(&rendered.head, &rendered.body))
}

/// The render bridge: one reply socket, one renderer, one request at
/// a time.
///
/// Requests are processed strictly in series; the reply for each
/// request is sent before the next one is read. A request that fails
/// to decode or render still gets exactly one reply — an error
/// document — so the channel never stalls.
pub struct Bridge<R> {
    listener: ReplyListener,
    renderer: R,
    template: DocumentTemplate,
}

impl<R: Renderer> Bridge<R> {
    /// Bind a bridge to an IPC address with the default template.
    pub fn bind(addr: &IpcAddress, renderer: R) -> Result<Self, ChannelError> {
        Ok(Self::new(ReplyListener::bind(addr)?, renderer))
    }

    /// Bind with explicit channel configuration.
    pub fn bind_with_config(
        addr: &IpcAddress,
        renderer: R,
        config: ChannelConfig,
    ) -> Result<Self, ChannelError> {
        Ok(Self::new(
            ReplyListener::bind_with_config(addr, config)?,
            renderer,
        ))
    }

    /// Wrap an already-bound listener.
    pub fn new(listener: ReplyListener, renderer: R) -> Self {
        Self {
            listener,
            renderer,
            template: DocumentTemplate::default(),
        }
    }

    /// Replace the document template.
    pub fn with_template(mut self, template: DocumentTemplate) -> Self {
        self.template = template;
        self
    }

    /// The socket path the bridge is bound to.
    pub fn path(&self) -> &std::path::Path {
        self.listener.path()
    }

    /// Accept sessions until `running` is cleared.
    ///
    /// Each session is served to completion before the next accept;
    /// a client disconnect ends its session, not the bridge.
    pub fn serve(&self, running: &AtomicBool) -> Result<(), ChannelError> {
        while running.load(Ordering::SeqCst) {
            self.serve_once(running)?;
        }
        Ok(())
    }

    /// Accept one session and serve it until the client disconnects.
    pub fn serve_once(&self, running: &AtomicBool) -> Result<(), ChannelError> {
        let mut channel = self.listener.accept()?;
        match channel.peer_credentials() {
            Some((uid, _gid, pid)) => {
                info!(client = channel.id(), uid, pid, "session started")
            }
            None => info!(client = channel.id(), "session started"),
        }

        while running.load(Ordering::SeqCst) {
            let request = match channel.recv() {
                Ok(payload) => payload,
                Err(ChannelError::Disconnected(reason)) => {
                    debug!(client = channel.id(), %reason, "session ended");
                    return Ok(());
                }
                Err(err) => return Err(err),
            };

            self.answer(&mut channel, request.as_ref())?;
        }
        Ok(())
    }

    /// Produce and send the single reply owed for one request.
    fn answer(&self, channel: &mut ReplyChannel, payload: &[u8]) -> Result<(), ChannelError> {
        let started = Instant::now();
        match render_document(&self.renderer, &self.template, payload) {
            Ok(document) => {
                info!(
                    client = channel.id(),
                    request_bytes = payload.len(),
                    document_bytes = document.len(),
                    elapsed_us = started.elapsed().as_micros() as u64,
                    "request rendered"
                );
                channel.reply(document.as_bytes())
            }
            Err(err) => {
                warn!(
                    client = channel.id(),
                    error = %err,
                    "render failed; sending error reply"
                );
                let document = self.template.error_document(&err.to_string());
                channel.reply_error(document.as_bytes())
            }
        }
    }
}
