use std::path::PathBuf;
use std::pin::Pin;
use std::task::{Context, Poll};

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::Stream;
use sha2::{Digest, Sha256};
use tokio_util::io::ReaderStream;

use crate::application::ports::identicon_renderer::{IdenticonPng, IdenticonRenderer};
use crate::infrastructure::scratch::ScratchFile;

const CELLS: usize = 5;
const CELL_PX: usize = 28;
const MARGIN: usize = 10;
const SIZE: usize = CELLS * CELL_PX + 2 * MARGIN;

const BG: [u8; 3] = [245, 245, 245];
const PALETTE: [[u8; 3]; 12] = [
    [229, 57, 53],
    [216, 27, 96],
    [142, 36, 170],
    [94, 53, 177],
    [57, 73, 171],
    [30, 136, 229],
    [0, 137, 123],
    [67, 160, 71],
    [192, 152, 35],
    [230, 119, 0],
    [244, 81, 30],
    [109, 76, 65],
];

/// Renders identicons into scratch files and streams them back. The image
/// is derived entirely from a SHA-256 of the seed: a palette color plus a
/// horizontally mirrored 5x5 cell grid.
pub struct FileBackedIdenticonRenderer {
    scratch_dir: Option<PathBuf>,
}

impl FileBackedIdenticonRenderer {
    pub fn new(scratch_dir: Option<PathBuf>) -> Self {
        Self { scratch_dir }
    }
}

fn rasterize(seed: &str) -> Vec<u8> {
    let digest = Sha256::digest(seed.as_bytes());
    let fg = PALETTE[digest[0] as usize % PALETTE.len()];

    // 15 bits of the digest decide the left three columns; the right side
    // mirrors them.
    let mut grid = [[false; CELLS]; CELLS];
    let mut bit = 0usize;
    for x in 0..=CELLS / 2 {
        for row in grid.iter_mut() {
            let on = (digest[1 + bit / 8] >> (bit % 8)) & 1 == 1;
            bit += 1;
            row[x] = on;
            row[CELLS - 1 - x] = on;
        }
    }

    let mut pixels = vec![0u8; SIZE * SIZE * 3];
    for py in 0..SIZE {
        for px in 0..SIZE {
            let on = cell_at(&grid, px, py);
            let color = if on { fg } else { BG };
            let at = (py * SIZE + px) * 3;
            pixels[at..at + 3].copy_from_slice(&color);
        }
    }
    pixels
}

fn cell_at(grid: &[[bool; CELLS]; CELLS], px: usize, py: usize) -> bool {
    if px < MARGIN || py < MARGIN {
        return false;
    }
    let cx = (px - MARGIN) / CELL_PX;
    let cy = (py - MARGIN) / CELL_PX;
    cx < CELLS && cy < CELLS && grid[cy][cx]
}

fn encode_into(scratch: &mut ScratchFile, pixels: &[u8]) -> anyhow::Result<()> {
    let mut encoder = png::Encoder::new(scratch.as_file_mut(), SIZE as u32, SIZE as u32);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(pixels)?;
    writer.finish()?;
    Ok(())
}

/// Keeps the scratch file alive for exactly as long as the byte stream;
/// dropping the stream (completion or disconnect) deletes the file.
struct GuardedStream {
    inner: ReaderStream<tokio::fs::File>,
    _guard: ScratchFile,
}

impl Stream for GuardedStream {
    type Item = std::io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

#[async_trait]
impl IdenticonRenderer for FileBackedIdenticonRenderer {
    async fn render(&self, seed: &str) -> anyhow::Result<IdenticonPng> {
        let seed = seed.to_string();
        let scratch_dir = self.scratch_dir.clone();
        let scratch = tokio::task::spawn_blocking(move || -> anyhow::Result<ScratchFile> {
            let mut scratch = ScratchFile::create_in(scratch_dir.as_deref())?;
            let pixels = rasterize(&seed);
            encode_into(&mut scratch, &pixels)?;
            Ok(scratch)
        })
        .await??;

        let len = scratch.as_file().metadata()?.len();
        let file = tokio::fs::File::from_std(scratch.reopen()?);
        Ok(IdenticonPng {
            len,
            stream: Box::pin(GuardedStream {
                inner: ReaderStream::new(file),
                _guard: scratch,
            }),
        })
    }
}
