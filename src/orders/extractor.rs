use tracing::debug;

use crate::constants::POST_INDEX_OFFSET;
use crate::orders::form::{parse_order_form, OrderForm};

/// An order form found in the thread, with the later posts that mention it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub form: OrderForm,
    /// Display position of the order post in the thread.
    pub post_index: usize,
    /// Later posts containing the username or the description, in thread order.
    pub replies: Vec<String>,
}

/// Find every order form in `posts` and collect the replies to each one.
///
/// Orders are returned in thread order. Posts that are not order forms are
/// skipped. Replies are only taken from posts after the order post.
#[must_use]
pub fn extract_orders(posts: &[String]) -> Vec<Order> {
    let orders: Vec<Order> = posts
        .iter()
        .enumerate()
        .filter_map(|(idx, post)| {
            let form = parse_order_form(post)?;
            let replies = posts[idx + 1..]
                .iter()
                .filter(|later| references_order(later, &form))
                .cloned()
                .collect();

            Some(Order {
                form,
                post_index: idx + POST_INDEX_OFFSET,
                replies,
            })
        })
        .collect();

    debug!(posts = posts.len(), orders = orders.len(), "Extracted orders");
    orders
}

/// Case-sensitive substring match on the username or the description.
fn references_order(post: &str, form: &OrderForm) -> bool {
    post.contains(form.username.as_str()) || post.contains(form.description.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_post(username: &str, description: &str) -> String {
        format!(
            "Username: {username}\nService Required: banner\nDescription: {description}\n\
             Preferred Shop (optional): none\nDo you agree to our Terms of Service: yes\nOther: -"
        )
    }

    fn posts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_no_orders() {
        let posts = posts(&["hello", "bump", "any shops open?"]);
        assert!(extract_orders(&posts).is_empty());
        assert!(extract_orders(&[]).is_empty());
    }

    #[test]
    fn test_post_index_offset() {
        let posts = vec![
            "hello".to_string(),
            order_post("alice", "blue banner"),
            "delivered, thanks!".to_string(),
        ];

        let orders = extract_orders(&posts);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].post_index, 1 + 4);
        assert_eq!(orders[0].form.username, "alice");
    }

    #[test]
    fn test_orders_keep_thread_order() {
        let posts = vec![
            order_post("zed", "zebra logo"),
            "chatter".to_string(),
            order_post("amy", "apple icon"),
            order_post("zed", "zebra logo"),
        ];

        let orders = extract_orders(&posts);
        let usernames: Vec<&str> = orders.iter().map(|o| o.form.username.as_str()).collect();
        assert_eq!(usernames, vec!["zed", "amy", "zed"]);
        let indices: Vec<usize> = orders.iter().map(|o| o.post_index).collect();
        assert_eq!(indices, vec![4, 6, 7]);
    }

    #[test]
    fn test_replies_match_username_or_description() {
        let posts = vec![
            order_post("alice", "blue banner"),
            "@alice working on it".to_string(),
            "unrelated".to_string(),
            "the blue banner is done".to_string(),
            "ALICE in caps does not count".to_string(),
        ];

        let orders = extract_orders(&posts);
        assert_eq!(
            orders[0].replies,
            vec!["@alice working on it", "the blue banner is done"]
        );
    }

    #[test]
    fn test_replies_only_come_from_later_posts() {
        let posts = vec![
            "alice said hi before ordering".to_string(),
            order_post("alice", "blue banner"),
            "alice: done".to_string(),
        ];

        let orders = extract_orders(&posts);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].replies, vec!["alice: done"]);
        assert!(!orders[0].replies.contains(&posts[1]));
    }

    #[test]
    fn test_later_order_post_can_be_a_reply() {
        // A second order by the same user mentions the username, so it counts
        // as a reply to the first one.
        let posts = vec![order_post("bob", "red logo"), order_post("bob", "green logo")];

        let orders = extract_orders(&posts);
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].replies, vec![posts[1].clone()]);
        assert!(orders[1].replies.is_empty());
    }

    #[test]
    fn test_last_post_order_has_no_replies() {
        let posts = vec!["intro".to_string(), order_post("carol", "gif")];
        let orders = extract_orders(&posts);
        assert_eq!(orders.len(), 1);
        assert!(orders[0].replies.is_empty());
    }
}
