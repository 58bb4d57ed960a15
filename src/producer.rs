//! Native render worker.
//!
//! Rows are split into bands and rendered on a `scoped_threadpool`. Each band
//! is a disjoint `chunks_mut` slice of the output, so jobs never share bytes
//! and the scope join is the only synchronization. Between rows every job
//! asks whether the request was superseded and bails out if so.

use crate::colorings::ColorFromMandel;
use crate::error::Result;
use crate::image::Image;
use crate::mandel_image::{fill_row, Mapping, PixelToPlane};
use crate::{MandelReply, MandelReq};
use async_channel::{Receiver, Sender};
use scoped_threadpool::Pool;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

/// Tuning for the render worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducerConfig {
    /// Worker threads in the pool.
    pub threads: u32,
    /// Rows handed to one pool job.
    pub rows_per_job: u32,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        let threads = std::thread::available_parallelism()
            .map(|n| n.get() as u32)
            .unwrap_or(4);
        ProducerConfig {
            threads,
            rows_per_job: 16,
        }
    }
}

/// Render `mapping` on `pool`.
///
/// Returns `Ok(None)` when `superseded` reported true during the render. The
/// bytes of a finished image are identical to those of
/// [`make_mandel_image`](crate::mandel_image::make_mandel_image).
pub fn render_parallel(
    pool: &mut Pool,
    mapping: &Mapping,
    rows_per_job: u32,
    coloring: &dyn ColorFromMandel,
    superseded: &(dyn Fn() -> bool + Sync),
) -> Result<Option<Image>> {
    let size = mapping.validate()?;
    let mut data = vec![0; size];
    let stride = mapping.stride();
    let band_rows = rows_per_job.max(1);
    let converter = PixelToPlane::from_mapping(mapping);
    let max = mapping.iteration_depth;
    let cancelled = AtomicBool::new(false);
    debug!(
        width = mapping.width,
        height = mapping.height,
        depth = max,
        threads = pool.thread_count(),
        "parallel render"
    );
    pool.scoped(|scope| {
        let bands = data.chunks_mut(stride.saturating_mul(band_rows as usize));
        for (band, chunk) in (0u32..).zip(bands) {
            let cancelled = &cancelled;
            let converter = &converter;
            scope.execute(move || {
                let first_row = band * band_rows;
                for (py, line) in (first_row..).zip(chunk.chunks_exact_mut(stride)) {
                    if cancelled.load(Ordering::Relaxed) {
                        return;
                    }
                    if superseded() {
                        cancelled.store(true, Ordering::Relaxed);
                        return;
                    }
                    fill_row(line, py, converter, max, coloring);
                }
            });
        }
    });
    if cancelled.into_inner() {
        debug!("render superseded");
        return Ok(None);
    }
    Ok(Some(Image::new(data, mapping.width, mapping.height)))
}

/// Serve render requests until either channel closes.
pub fn mandel_producer(req_receiver: Receiver<MandelReq>, reply_sender: Sender<MandelReply>) {
    mandel_producer_with(ProducerConfig::default(), req_receiver, reply_sender)
}

pub fn mandel_producer_with(
    config: ProducerConfig,
    req_receiver: Receiver<MandelReq>,
    reply_sender: Sender<MandelReply>,
) {
    let mut pool = Pool::new(config.threads.max(1));
    while let Ok(mut req) = req_receiver.recv_blocking() {
        // Only the newest request matters
        while let Ok(newer) = req_receiver.try_recv() {
            req = newer;
        }
        let superseded = || !req_receiver.is_empty();
        let result = render_parallel(
            &mut pool,
            &req.mapping,
            config.rows_per_job,
            req.coloring.as_ref(),
            &superseded,
        );
        let result = match result {
            Ok(Some(image)) => Ok(image),
            Ok(None) => continue,
            Err(e) => {
                warn!(error = %e, "rejected render request");
                Err(e)
            }
        };
        let reply = MandelReply {
            mapping: req.mapping,
            result,
        };
        if reply_sender.send_blocking(reply).is_err() {
            break;
        }
    }
    debug!("producer stopped");
}
