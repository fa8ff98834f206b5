//! C ABI surface for callers in other runtimes.
//!
//! The exported pair of functions mirrors the library entry point: one call
//! performs the alignment and hands back a NUL-terminated record whose
//! ownership transfers to the caller, and one call releases that buffer.
//! Every malformed input degrades to the empty record; panics never cross the
//! boundary.

use std::ffi::{c_char, c_double, c_int, CStr, CString};
use std::panic::{self, AssertUnwindSafe};

use crate::{AlignmentConfig, SemiGlobalAligner};

fn empty_record() -> *mut c_char {
    CString::default().into_raw()
}

fn record_to_raw(record: String) -> *mut c_char {
    match CString::new(record) {
        Ok(buffer) => buffer.into_raw(),
        Err(_) => empty_record(),
    }
}

/// Truncate a NUL-terminated sequence to its declared length when the caller
/// passed a shorter one.
fn clip_to_declared(seq: &[u8], declared: c_int) -> &[u8] {
    if declared >= 0 && (declared as usize) < seq.len() {
        &seq[..declared as usize]
    } else {
        seq
    }
}

/// Align two NUL-terminated sequences and return the wire record.
///
/// The returned buffer is owned by the caller and must be released exactly
/// once with [`free_alignment_string`]. Rejected or impossible alignments
/// return an empty (but still allocated) record, as do null inputs.
///
/// # Safety
///
/// `seq1` and `seq2` must be null or valid NUL-terminated C strings that stay
/// alive for the duration of the call.
#[no_mangle]
pub unsafe extern "C" fn semi_global_align(
    seq1: *const c_char,
    seq2: *const c_char,
    seq1_len: c_int,
    seq2_len: c_int,
    kmer_size: c_int,
    band_size: c_int,
    allowed_length_discrepancy: c_double,
) -> *mut c_char {
    if seq1.is_null() || seq2.is_null() {
        return empty_record();
    }
    let seq1 = clip_to_declared(CStr::from_ptr(seq1).to_bytes(), seq1_len);
    let seq2 = clip_to_declared(CStr::from_ptr(seq2).to_bytes(), seq2_len);

    let config = AlignmentConfig::new(
        kmer_size.max(0) as usize,
        band_size.max(0) as usize,
        allowed_length_discrepancy,
    );

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        SemiGlobalAligner::new(config).align(seq1, seq2).to_record()
    }));
    match outcome {
        Ok(record) => record_to_raw(record),
        Err(_) => empty_record(),
    }
}

/// Release a record previously returned by [`semi_global_align`].
///
/// Accepts null as a no-op so callers may release unconditionally.
///
/// # Safety
///
/// `record` must be null or a pointer obtained from [`semi_global_align`]
/// that has not been released before.
#[no_mangle]
pub unsafe extern "C" fn free_alignment_string(record: *mut c_char) {
    if record.is_null() {
        return;
    }
    drop(CString::from_raw(record));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;

    fn call(
        seq1: &CStr,
        seq2: &CStr,
        kmer_size: c_int,
        band_size: c_int,
        discrepancy: c_double,
    ) -> String {
        let raw = unsafe {
            semi_global_align(
                seq1.as_ptr(),
                seq2.as_ptr(),
                seq1.to_bytes().len() as c_int,
                seq2.to_bytes().len() as c_int,
                kmer_size,
                band_size,
                discrepancy,
            )
        };
        assert!(!raw.is_null());
        let record = unsafe { CStr::from_ptr(raw) }
            .to_string_lossy()
            .into_owned();
        unsafe { free_alignment_string(raw) };
        record
    }

    #[test]
    fn round_trip_produces_parseable_record() {
        let seq = CString::new("ACGTGCTTAGCCATTGACCA").expect("no interior NUL");
        let record = call(&seq, &seq, 5, 20, 0.5);
        let fields: Vec<&str> = record.split(',').collect();
        assert_eq!(fields.len(), 16);
        assert_eq!(fields[0], "20M");
    }

    #[test]
    fn null_inputs_return_empty_record() {
        let seq = CString::new("ACGT").expect("no interior NUL");
        let raw = unsafe { semi_global_align(ptr::null(), seq.as_ptr(), 4, 4, 2, 10, 0.5) };
        assert!(!raw.is_null());
        assert_eq!(unsafe { CStr::from_ptr(raw) }.to_bytes(), b"");
        unsafe { free_alignment_string(raw) };
    }

    #[test]
    fn negative_parameters_degrade_to_empty_record() {
        let seq = CString::new("ACGTACGTAC").expect("no interior NUL");
        let record = call(&seq, &seq, -3, -1, 0.5);
        assert_eq!(record, "");
    }

    #[test]
    fn declared_length_truncates_the_input() {
        let long = CString::new("ACGTGCTTAGCCATT").expect("no interior NUL");
        let raw = unsafe {
            semi_global_align(long.as_ptr(), long.as_ptr(), 8, 15, 3, 10, 0.5)
        };
        let record = unsafe { CStr::from_ptr(raw) }
            .to_string_lossy()
            .into_owned();
        unsafe { free_alignment_string(raw) };
        // seq1 is clipped to its first eight bases, so only those can align.
        let fields: Vec<&str> = record.split(',').collect();
        assert_eq!(fields[2], "8");
    }

    #[test]
    fn release_accepts_null() {
        unsafe { free_alignment_string(ptr::null_mut()) };
    }
}
