//! Aggregates over the NAS folder tree.
//!
//! Trees can be deep, so every walk uses an explicit stack.

use crate::models::NasFolder;

impl NasFolder {
    /// Sum of `file_count` over this folder and all descendants.
    pub fn total_files(&self) -> u64 {
        let mut total = 0u64;
        let mut stack: Vec<&NasFolder> = vec![self];
        while let Some(folder) = stack.pop() {
            total = total.saturating_add(folder.file_count);
            stack.extend(folder.children.iter());
        }
        total
    }

    /// Number of descendant folders, not counting this one.
    pub fn total_folders(&self) -> usize {
        let mut total = 0usize;
        let mut stack: Vec<&NasFolder> = vec![self];
        while let Some(folder) = stack.pop() {
            total += folder.children.len();
            stack.extend(folder.children.iter());
        }
        total
    }

    /// Find the folder whose `path` equals `path`.
    pub fn find(&self, path: &str) -> Option<&NasFolder> {
        let mut stack: Vec<&NasFolder> = vec![self];
        while let Some(folder) = stack.pop() {
            if folder.path == path {
                return Some(folder);
            }
            stack.extend(folder.children.iter());
        }
        None
    }

    /// Pre-order walk yielding `(depth, folder)`, children in listed order.
    pub fn walk(&self) -> Vec<(usize, &NasFolder)> {
        let mut out = Vec::new();
        let mut stack: Vec<(usize, &NasFolder)> = vec![(0, self)];
        while let Some((depth, folder)) = stack.pop() {
            out.push((depth, folder));
            // reversed so the first child is popped next
            for child in folder.children.iter().rev() {
                stack.push((depth + 1, child));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folder(path: &str, file_count: u64, children: Vec<NasFolder>) -> NasFolder {
        NasFolder {
            name: path.rsplit('/').next().unwrap_or(path).to_string(),
            path: path.to_string(),
            file_count,
            folder_count: children.len() as u64,
            children,
        }
    }

    fn sample() -> NasFolder {
        folder(
            "/archive",
            2,
            vec![
                folder("/archive/WSOP", 3, Vec::new()),
                folder("/archive/HCL", 5, Vec::new()),
            ],
        )
    }

    #[test]
    fn test_total_files_sums_descendants() {
        assert_eq!(sample().total_files(), 10);
    }

    #[test]
    fn test_leaf_total_is_own_count() {
        assert_eq!(folder("/x", 7, Vec::new()).total_files(), 7);
        assert_eq!(folder("/x", 0, Vec::new()).total_files(), 0);
    }

    #[test]
    fn test_deep_tree_does_not_overflow_stack() {
        let mut node = folder("/d/100000", 1, Vec::new());
        for depth in (0..100_000).rev() {
            node = folder(&format!("/d/{}", depth), 1, vec![node]);
        }
        assert_eq!(node.total_files(), 100_001);
        assert_eq!(node.total_folders(), 100_000);

        // Drop iteratively as well; the derived Drop is recursive.
        let mut stack = vec![node];
        while let Some(mut n) = stack.pop() {
            stack.append(&mut n.children);
        }
    }

    #[test]
    fn test_find_and_walk() {
        let root = sample();
        assert_eq!(root.find("/archive/HCL").map(|f| f.file_count), Some(5));
        assert!(root.find("/archive/GGM").is_none());

        let walked: Vec<(usize, &str)> = root
            .walk()
            .into_iter()
            .map(|(d, f)| (d, f.name.as_str()))
            .collect();
        assert_eq!(walked, vec![(0, "archive"), (1, "WSOP"), (1, "HCL")]);
        assert_eq!(root.total_folders(), 2);
    }
}
