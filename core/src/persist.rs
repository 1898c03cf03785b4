use crate::index::{checked_doc_id, InvertedIndex};
use crate::DocId;
use anyhow::{bail, ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, create_dir_all, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u32,
    pub num_terms: u32,
    pub created_at: String,
    pub version: u32,
}

/// Everything needed to restore an index, written and read as one unit.
#[derive(Serialize, Deserialize)]
struct IndexSnapshot {
    version: u32,
    postings: HashMap<String, Vec<DocId>>,
    doc_id_map: HashMap<DocId, String>,
    reverse_doc_id_map: HashMap<String, DocId>,
    next_internal_id: DocId,
}

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    fn snapshot(&self) -> PathBuf { self.root.join("index.bin") }
    fn snapshot_tmp(&self) -> PathBuf { self.root.join("index.bin.tmp") }
    fn meta(&self) -> PathBuf { self.root.join("meta.json") }
}

/// Write the index snapshot and `meta.json`.
///
/// The snapshot goes to a temporary file that is renamed into place, so a
/// reader sees either the previous snapshot or the complete new one.
pub fn save_index(paths: &IndexPaths, index: &InvertedIndex, created_at: &str) -> Result<()> {
    create_dir_all(&paths.root)?;
    let next_internal_id = checked_doc_id(index.doc_ids.len())
        .with_context(|| format!("{} documents exceed the DocId range", index.doc_ids.len()))?;
    let snapshot = IndexSnapshot {
        version: SNAPSHOT_VERSION,
        postings: index.postings.clone(),
        doc_id_map: (0..next_internal_id).zip(index.doc_ids.iter().cloned()).collect(),
        reverse_doc_id_map: index.reverse_doc_ids.clone(),
        next_internal_id,
    };

    let tmp = paths.snapshot_tmp();
    {
        let mut w = BufWriter::new(File::create(&tmp)?);
        bincode::serialize_into(&mut w, &snapshot)?;
        w.flush()?;
    }
    fs::rename(&tmp, paths.snapshot())
        .with_context(|| format!("moving snapshot into {}", paths.snapshot().display()))?;

    let meta = MetaFile {
        num_docs: snapshot.next_internal_id,
        num_terms: u32::try_from(index.vocabulary_size())?,
        created_at: created_at.to_string(),
        version: SNAPSHOT_VERSION,
    };
    save_meta(paths, &meta)?;
    tracing::info!(
        root = %paths.root.display(),
        num_docs = meta.num_docs,
        num_terms = meta.num_terms,
        "index saved"
    );
    Ok(())
}

/// Load and validate a snapshot written by [`save_index`].
pub fn load_index(paths: &IndexPaths) -> Result<InvertedIndex> {
    let file = File::open(paths.snapshot())
        .with_context(|| format!("opening {}", paths.snapshot().display()))?;
    let snapshot: IndexSnapshot = bincode::deserialize_from(BufReader::new(file))?;
    let index = restore(snapshot)?;
    tracing::info!(
        num_docs = index.collection_size(),
        num_terms = index.vocabulary_size(),
        "index loaded"
    );
    Ok(index)
}

fn restore(snapshot: IndexSnapshot) -> Result<InvertedIndex> {
    if snapshot.version != SNAPSHOT_VERSION {
        bail!("unsupported snapshot version {} (expected {})", snapshot.version, SNAPSHOT_VERSION);
    }
    let n = snapshot.next_internal_id as usize;
    ensure!(
        snapshot.doc_id_map.len() == n && snapshot.reverse_doc_id_map.len() == n,
        "document maps do not match next_internal_id {n}"
    );

    let mut doc_ids = Vec::with_capacity(n);
    for id in 0..snapshot.next_internal_id {
        let ext = snapshot
            .doc_id_map
            .get(&id)
            .with_context(|| format!("internal id {id} has no external id"))?;
        ensure!(
            snapshot.reverse_doc_id_map.get(ext) == Some(&id),
            "external id {ext:?} does not map back to {id}"
        );
        doc_ids.push(ext.clone());
    }

    for (term, plist) in &snapshot.postings {
        ensure!(
            plist.windows(2).all(|w| w[0] < w[1]),
            "postings for {term:?} are not strictly ascending"
        );
        if let Some(&last) = plist.last() {
            ensure!((last as usize) < n, "postings for {term:?} reference unknown document {last}");
        }
    }

    Ok(InvertedIndex {
        postings: snapshot.postings,
        doc_ids,
        reverse_doc_ids: snapshot.reverse_doc_id_map,
    })
}

pub fn save_meta(paths: &IndexPaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let json = serde_json::to_string_pretty(meta)?;
    fs::write(paths.meta(), json)?;
    Ok(())
}

pub fn load_meta(paths: &IndexPaths) -> Result<MetaFile> {
    let buf = fs::read_to_string(paths.meta())
        .with_context(|| format!("reading {}", paths.meta().display()))?;
    let meta: MetaFile = serde_json::from_str(&buf)?;
    Ok(meta)
}
