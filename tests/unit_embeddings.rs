// Unit tests for embedding loading and lookup.
//
// Tests the lenient table lookup, the strict cache lookup, and that the cache
// is a faithful restriction of the table.

use std::fs;
use std::path::PathBuf;

use tweetvec::embeddings::cache::{EmbeddingCache, LookupError};
use tweetvec::embeddings::delimited::{read_table, DelimitedFormat, Quoting};
use tweetvec::embeddings::table::EmbeddingTable;
use tweetvec::embeddings::traits::WordVectors;

fn write_temp(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("tweetvec-{}-{name}", std::process::id()));
    fs::write(&path, contents).unwrap();
    path
}

fn glove_table() -> EmbeddingTable {
    let text = "the 0.1 0.2 0.3\n\
                ball 1.0 -1.0 0.5\n\
                \" 0.0 0.0 9.0\n\
                goal 0.25 0.75 -0.5\n";
    let path = write_temp("glove.txt", text);
    let table = EmbeddingTable::load(&path, &DelimitedFormat::glove(), 3).unwrap();
    fs::remove_file(&path).ok();
    table
}

// ============================================================
// Loading
// ============================================================

#[test]
fn load_glove_format_keeps_file_order() {
    let table = glove_table();
    assert_eq!(table.len(), 4);
    assert_eq!(table.words(), &["the", "ball", "\"", "goal"]);
    assert_eq!(table.dim(), 3);
}

#[test]
fn load_glove_bare_quote_token() {
    let table = glove_table();
    assert_eq!(table.get("\""), Some(&[0.0, 0.0, 9.0][..]));
}

#[test]
fn load_missing_file_fails() {
    let result = EmbeddingTable::load(
        &PathBuf::from("/nonexistent/glove.txt"),
        &DelimitedFormat::glove(),
        3,
    );
    assert!(result.is_err());
}

#[test]
fn load_non_numeric_field_fails() {
    let path = write_temp("bad.txt", "ball 1.0 abc 0.5\n");
    let result = EmbeddingTable::load(&path, &DelimitedFormat::glove(), 3);
    fs::remove_file(&path).ok();
    assert!(result.is_err());
}

#[test]
fn load_wrong_dimension_fails() {
    let path = write_temp("wide.txt", "ball 1.0 2.0 3.0 4.0\n");
    let result = EmbeddingTable::load(&path, &DelimitedFormat::glove(), 3);
    fs::remove_file(&path).ok();
    assert!(result.is_err());
}

#[test]
fn read_table_with_header_and_quotes() {
    let path = write_temp("quoted.csv", "word,x,y\n\"a,b\",1,2\nc,3,4\n");
    let raw = read_table(
        &path,
        &DelimitedFormat {
            delimiter: ',',
            header: true,
            quoting: Quoting::Minimal,
        },
    )
    .unwrap();
    fs::remove_file(&path).ok();
    assert_eq!(raw.row_names, vec!["a,b", "c"]);
    assert_eq!(raw.col_names.unwrap(), vec!["x", "y"]);
    assert_eq!(raw.rows[1], vec![3.0, 4.0]);
}

// ============================================================
// Lookup paths
// ============================================================

#[test]
fn fallback_lookup_returns_stored_vector_for_every_known_word() {
    let table = glove_table();
    for word in table.words() {
        assert_eq!(
            table.lookup_with_fallback(word).as_ref(),
            table.get(word).unwrap()
        );
    }
}

#[test]
fn fallback_lookup_oov_is_zero_of_dim() {
    let table = glove_table();
    for word in ["quarterback", "", "THE", "goal "] {
        let v = table.lookup_with_fallback(word);
        assert_eq!(v.len(), 3);
        assert!(v.iter().all(|&x| x == 0.0), "{word:?} should be zero");
    }
}

#[test]
fn cache_matches_table_for_every_cached_word() {
    let table = glove_table();
    let vocab = ["goal", "ball", "goal", "unknownword", "the"];
    let cache = EmbeddingCache::build(&table, &vocab);

    for word in vocab {
        assert_eq!(
            cache.lookup_strict(word).unwrap(),
            table.lookup_with_fallback(word).as_ref()
        );
    }
    assert_eq!(cache.len(), 4);
    assert_eq!(cache.oov_count(), 1);
}

#[test]
fn cache_is_strict_outside_its_vocabulary() {
    let table = glove_table();
    let cache = EmbeddingCache::build(&table, &["goal"]);
    // Present in the table but not in the cache
    assert_eq!(
        cache.lookup_strict("ball"),
        Err(LookupError::MissingWord("ball".to_string()))
    );
    assert!(cache.vector("ball").is_err());
}

#[test]
fn word_vectors_trait_reports_dim() {
    let table = glove_table();
    let cache = EmbeddingCache::build(&table, &["ball"]);
    assert_eq!(WordVectors::dim(&table), 3);
    assert_eq!(WordVectors::dim(&cache), 3);
    assert_eq!(table.vector("nope").unwrap().as_ref(), &[0.0, 0.0, 0.0]);
}
