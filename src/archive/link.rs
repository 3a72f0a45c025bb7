//! Reference linking: turns cited identities into a two-way graph.
//!
//! Links are identity sets on each post. A citation of a post that is not
//! in the archive gets a placeholder, created once per missing identity.

use tracing::{debug, info};

use crate::archive::Archive;
use crate::model::post::Post;

impl Archive {
    /// Resolve every real post's references.
    ///
    /// Missing targets become synthetic placeholders registered under their
    /// identity only. Back-links are recorded on real targets; placeholders
    /// never collect them. Returns the number of placeholders created.
    pub fn link_references(&mut self) -> usize {
        let real = self.posts.len();
        let mut created = 0usize;
        let mut links = 0usize;

        for position in 0..real {
            if self.posts[position].synthetic {
                continue;
            }
            let citing = self.posts[position].identity.clone();
            let line = self.posts[position].line_number;
            let cited: Vec<String> = self.posts[position].references.iter().cloned().collect();

            for identity in cited {
                let target = match self.position_of(&identity) {
                    Some(target) => target,
                    None => {
                        debug!(identity = %identity, line, "Adding placeholder for missing post");
                        created += 1;
                        self.insert_synthetic(Post::missing(&identity, line))
                    }
                };

                let target = &mut self.posts[target];
                if !target.synthetic {
                    target.referenced_by.insert(citing.clone());
                }
                links += 1;
            }
        }

        info!(links, placeholders = created, "Linked references");
        created
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::post::MISSING_SUBJECT;

    fn post(identity: &str, line: usize, refs: &[&str]) -> Post {
        let mut post = Post::missing(identity, line);
        post.synthetic = false;
        post.subject = "real".to_string();
        post.references = refs.iter().map(|s| s.to_string()).collect();
        post
    }

    fn archive(posts: Vec<Post>) -> Archive {
        let mut archive = Archive::new();
        for post in posts {
            archive.insert(post).unwrap();
        }
        archive
    }

    #[test]
    fn test_back_links_between_real_posts() {
        let mut archive = archive(vec![
            post("a1@x", 1, &[]),
            post("b2@x", 10, &["a1@x"]),
            post("c3@x", 20, &["a1@x", "b2@x"]),
        ]);
        assert_eq!(archive.link_references(), 0);

        let a = archive.get("a1@x").unwrap();
        assert_eq!(
            a.referenced_by.iter().cloned().collect::<Vec<_>>(),
            vec!["b2@x", "c3@x"]
        );
        let b = archive.get("b2@x").unwrap();
        assert!(b.referenced_by.contains("c3@x"));
        assert_eq!(archive.references_of(b).len(), 1);
        assert_eq!(archive.referenced_by_of(b)[0].identity, "c3@x");
    }

    #[test]
    fn test_one_placeholder_per_missing_identity() {
        let mut archive = archive(vec![
            post("b2@x", 10, &["gone@x"]),
            post("c3@x", 20, &["gone@x"]),
            post("d4@x", 30, &["gone@x", "lost@x"]),
        ]);
        assert_eq!(archive.link_references(), 2);
        assert_eq!(archive.len(), 5);

        let gone = archive.get("gone@x").unwrap();
        assert!(gone.synthetic);
        assert_eq!(gone.subject, MISSING_SUBJECT);
        assert_eq!(gone.line_number, 10);
        assert!(gone.referenced_by.is_empty());

        // Placeholders are not reachable by hash id or line number.
        assert!(archive.by_hash_id(&gone.hash_id).is_none());
        assert_eq!(archive.by_line(10).unwrap().identity, "b2@x");
    }

    #[test]
    fn test_forward_links_resolve_to_placeholders() {
        let mut archive = archive(vec![post("b2@x", 10, &["gone@x", "a1@x"]), post("a1@x", 2, &[])]);
        archive.link_references();

        let b = archive.get("b2@x").unwrap();
        let cited = archive.references_of(b);
        assert_eq!(cited.len(), 2);
        assert!(cited.iter().any(|p| p.synthetic && p.identity == "gone@x"));
        assert!(archive.get("a1@x").unwrap().referenced_by.contains("b2@x"));
    }

    #[test]
    fn test_linking_twice_adds_nothing() {
        let mut archive = archive(vec![post("b2@x", 10, &["gone@x"])]);
        assert_eq!(archive.link_references(), 1);
        assert_eq!(archive.link_references(), 0);
        assert_eq!(archive.len(), 2);
    }
}
