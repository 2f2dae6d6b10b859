//! Pagination des listes d'enfants et de résultats

/// Page number requesting the whole sequence at once
pub const PAGE_ALL: u32 = u32::MAX;

/// Slices `items` to the requested page
///
/// Returns `None` for a zero page size or when the page starts past the end
/// of the sequence, so callers can tell "no such page" apart from an empty
/// collection (which is answered before paginating). A trailing partial page
/// is returned as is. [`PAGE_ALL`] returns every item regardless of
/// `page_size`.
///
/// # Examples
///
/// ```
/// use pmobrowser::paginate::{paginate, PAGE_ALL};
///
/// let items = vec![1, 2, 3, 4, 5];
/// assert_eq!(paginate(items.clone(), 1, 2), Some(vec![3, 4]));
/// assert_eq!(paginate(items.clone(), 2, 2), Some(vec![5]));
/// assert_eq!(paginate(items.clone(), 3, 2), None);
/// assert_eq!(paginate(items, PAGE_ALL, 0), Some(vec![1, 2, 3, 4, 5]));
/// ```
pub fn paginate<T>(mut items: Vec<T>, page: u32, page_size: u32) -> Option<Vec<T>> {
    if page == PAGE_ALL {
        return Some(items);
    }
    if page_size == 0 {
        return None;
    }

    let size = page_size as usize;
    let start = (page as usize).checked_mul(size)?;
    if start >= items.len() {
        return None;
    }
    let end = start.saturating_add(size).min(items.len());

    items.truncate(end);
    items.drain(..start);
    Some(items)
}
