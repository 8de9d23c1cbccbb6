//! Byte-addressed storage backing.
//!
//! `ByteStore` is the single backend shared by [`ValueArray`] and
//! [`BitVector`]: a flat byte range that lives either in one memory
//! allocation, in an LRU-cached set of pages over a file, or in a read-only
//! memory mapping of an existing file. Reads and writes may span page
//! boundaries; dirty pages are written back on eviction and on `flush`.
//!
//! [`ValueArray`]: super::ValueArray
//! [`BitVector`]: super::BitVector

use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Context, Result};
use lru::LruCache;
use memmap2::Mmap;

use super::pool::BufferPool;
use super::StoreConfig;

/// Pages held in cache per file-backed store.
const CACHE_PAGES: usize = 16;

pub(crate) enum ByteStore {
    /// Single zeroed allocation.
    Memory(Box<[u8]>),
    /// Page cache over a backing file.
    Paged(Mutex<PageStore>),
    /// Read-only mapping of an existing file.
    Mapped(Mmap),
}

impl ByteStore {
    /// Create a zeroed store of `len` bytes.
    ///
    /// An explicit `file` forces file backing. Otherwise the store spills to
    /// an anonymous temp file when `len` crosses the configured threshold,
    /// and stays in memory when it does not.
    pub(crate) fn create(len: u64, config: &StoreConfig, file: Option<File>) -> Result<Self> {
        let spill = config.on_disk_threshold.is_some_and(|t| len >= t);
        let file = match file {
            Some(f) => Some(f),
            None if spill => {
                Some(tempfile::tempfile().context("failed to create spill file")?)
            }
            None => None,
        };

        match file {
            Some(file) => {
                let store = PageStore::create(file, len, config)?;
                Ok(ByteStore::Paged(Mutex::new(store)))
            }
            None => {
                let len = usize::try_from(len).context("store too large for memory backing")?;
                Ok(ByteStore::Memory(vec![0u8; len].into_boxed_slice()))
            }
        }
    }

    /// Map an existing file read-only. Returns the store and its byte length.
    pub(crate) fn map(file: &File) -> Result<(Self, u64)> {
        let mmap = unsafe { Mmap::map(file) }.context("failed to map backing file")?;
        let len = mmap.len() as u64;
        Ok((ByteStore::Mapped(mmap), len))
    }

    pub(crate) fn read(&self, offset: u64, out: &mut [u8]) -> Result<()> {
        match self {
            ByteStore::Memory(data) => {
                out.copy_from_slice(slice_range(data, offset, out.len())?);
                Ok(())
            }
            ByteStore::Mapped(mmap) => {
                out.copy_from_slice(slice_range(mmap, offset, out.len())?);
                Ok(())
            }
            ByteStore::Paged(store) => store.lock().unwrap().read_at(offset, out),
        }
    }

    pub(crate) fn write(&mut self, offset: u64, data: &[u8]) -> Result<()> {
        match self {
            ByteStore::Memory(buf) => {
                let start = usize::try_from(offset).context("write offset out of range")?;
                let end = start
                    .checked_add(data.len())
                    .filter(|&end| end <= buf.len())
                    .context("write past end of storage")?;
                buf[start..end].copy_from_slice(data);
                Ok(())
            }
            ByteStore::Mapped(_) => bail!("cannot write to a read-only mapping"),
            ByteStore::Paged(store) => store.lock().unwrap().write_at(offset, data),
        }
    }

    pub(crate) fn flush(&mut self) -> Result<()> {
        match self {
            ByteStore::Memory(_) | ByteStore::Mapped(_) => Ok(()),
            ByteStore::Paged(store) => store.lock().unwrap().flush(),
        }
    }
}

fn slice_range(data: &[u8], offset: u64, len: usize) -> Result<&[u8]> {
    let start = usize::try_from(offset).context("read offset out of range")?;
    start
        .checked_add(len)
        .and_then(|end| data.get(start..end))
        .context("read past end of storage")
}

struct Page {
    buf: Box<[u8]>,
    dirty: bool,
}

pub(crate) struct PageStore {
    file: File,
    page_size: usize,
    cache: LruCache<u64, Page>,
    pool: Option<Arc<BufferPool>>,
}

impl PageStore {
    fn create(file: File, len: u64, config: &StoreConfig) -> Result<Self> {
        let page_size = config.page_size.max(1);
        // Drop any prior contents, then pre-size to whole pages so every
        // page read succeeds with zeros.
        let pages = len.div_ceil(page_size as u64).max(1);
        file.set_len(0).context("failed to truncate backing file")?;
        file.set_len(pages * page_size as u64)
            .context("failed to size backing file")?;
        Ok(Self {
            file,
            page_size,
            cache: LruCache::new(NonZeroUsize::new(CACHE_PAGES).unwrap()),
            pool: config.pool.clone(),
        })
    }

    fn read_at(&mut self, mut offset: u64, mut out: &mut [u8]) -> Result<()> {
        while !out.is_empty() {
            let page_no = offset / self.page_size as u64;
            let in_page = (offset % self.page_size as u64) as usize;
            let n = out.len().min(self.page_size - in_page);
            let page = self.page(page_no)?;
            out[..n].copy_from_slice(&page.buf[in_page..in_page + n]);
            let rest = out;
            out = &mut rest[n..];
            offset += n as u64;
        }
        Ok(())
    }

    fn write_at(&mut self, mut offset: u64, mut data: &[u8]) -> Result<()> {
        while !data.is_empty() {
            let page_no = offset / self.page_size as u64;
            let in_page = (offset % self.page_size as u64) as usize;
            let n = data.len().min(self.page_size - in_page);
            let page = self.page(page_no)?;
            page.buf[in_page..in_page + n].copy_from_slice(&data[..n]);
            page.dirty = true;
            data = &data[n..];
            offset += n as u64;
        }
        Ok(())
    }

    /// Fetch a page into the cache, evicting (and writing back) the
    /// least-recently-used page when full.
    fn page(&mut self, page_no: u64) -> Result<&mut Page> {
        if !self.cache.contains(&page_no) {
            let mut buf = match &self.pool {
                Some(pool) => pool.acquire(self.page_size),
                None => vec![0u8; self.page_size].into_boxed_slice(),
            };
            self.file
                .seek(SeekFrom::Start(page_no * self.page_size as u64))
                .context("failed to seek to page")?;
            self.file
                .read_exact(&mut buf)
                .context("failed to read page")?;

            let evicted = self.cache.push(page_no, Page { buf, dirty: false });
            if let Some((no, page)) = evicted {
                if page.dirty {
                    self.file
                        .seek(SeekFrom::Start(no * self.page_size as u64))
                        .context("failed to seek to evicted page")?;
                    self.file
                        .write_all(&page.buf)
                        .context("failed to write back evicted page")?;
                }
                if let Some(pool) = &self.pool {
                    pool.release(page.buf);
                }
            }
        }
        Ok(self.cache.get_mut(&page_no).unwrap())
    }

    fn flush(&mut self) -> Result<()> {
        let Self {
            file,
            page_size,
            cache,
            ..
        } = self;
        for (no, page) in cache.iter_mut() {
            if page.dirty {
                file.seek(SeekFrom::Start(no * *page_size as u64))
                    .context("failed to seek to dirty page")?;
                file.write_all(&page.buf)
                    .context("failed to write back dirty page")?;
                page.dirty = false;
            }
        }
        file.flush().context("failed to flush backing file")?;
        Ok(())
    }
}

impl Drop for PageStore {
    fn drop(&mut self) {
        // Unflushed dirty pages die with the store; flush is explicit.
        if let Some(pool) = self.pool.clone() {
            while let Some((_, page)) = self.cache.pop_lru() {
                pool.release(page.buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disk_config() -> StoreConfig {
        StoreConfig::default()
            .page_size(64)
            .on_disk_threshold(0)
    }

    #[test]
    fn memory_round_trip() {
        let mut store = ByteStore::create(32, &StoreConfig::default(), None).unwrap();
        store.write(5, &[1, 2, 3]).unwrap();
        let mut out = [0u8; 3];
        store.read(5, &mut out).unwrap();
        assert_eq!(out, [1, 2, 3]);
    }

    #[test]
    fn paged_round_trip_across_boundaries() {
        // 64-byte pages; a write starting at 60 spans two pages.
        let mut store = ByteStore::create(256, &disk_config(), None).unwrap();
        let data: Vec<u8> = (0..10).collect();
        store.write(60, &data).unwrap();
        let mut out = [0u8; 10];
        store.read(60, &mut out).unwrap();
        assert_eq!(&out[..], &data[..]);

        // Untouched bytes read back as zero.
        let mut one = [0xFFu8; 1];
        store.read(128, &mut one).unwrap();
        assert_eq!(one[0], 0);
    }

    #[test]
    fn paged_evicts_and_reloads() {
        // More pages than the cache holds, so every page gets evicted at
        // least once before being read back.
        let mut store = ByteStore::create((CACHE_PAGES as u64 + 8) * 64, &disk_config(), None).unwrap();
        for i in 0..CACHE_PAGES as u64 + 8 {
            store.write(i * 64, &[i as u8]).unwrap();
        }
        for i in 0..CACHE_PAGES as u64 + 8 {
            let mut out = [0u8; 1];
            store.read(i * 64, &mut out).unwrap();
            assert_eq!(out[0], i as u8);
        }
    }

    #[test]
    fn pooled_pages_are_recycled() {
        let pool = Arc::new(BufferPool::new(32));
        let config = disk_config().pool(pool.clone());
        {
            let mut store = ByteStore::create(1024, &config, None).unwrap();
            for i in 0..16 {
                store.write(i * 64, &[1]).unwrap();
            }
        }
        // Dropping the store parks its cached pages in the pool.
        assert!(pool.idle() > 0);
    }

    #[test]
    fn out_of_range_read_fails() {
        let store = ByteStore::create(8, &StoreConfig::default(), None).unwrap();
        let mut out = [0u8; 4];
        assert!(store.read(6, &mut out).is_err());
    }
}
