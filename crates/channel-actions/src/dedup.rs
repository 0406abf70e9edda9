// Channel Actions
// Copyright (C) 2025 Throneless Tech

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

/// Decides whether a (post, action) pair is seen for the first time.
pub trait PostDeliveryGuard: Send + Sync {
    fn first_delivery(&self, post_id: &str, action_id: &str) -> bool;
}

/// For event sources that deliver each post at most once.
pub struct AtMostOnce;

impl PostDeliveryGuard for AtMostOnce {
    fn first_delivery(&self, _post_id: &str, _action_id: &str) -> bool {
        true
    }
}

#[derive(Default)]
struct Seen {
    keys: HashSet<(String, String)>,
    order: VecDeque<(String, String)>,
}

/// Remembers the most recent `capacity` (post, action) pairs and refuses to
/// see them twice.
pub struct RecentPosts {
    capacity: usize,
    seen: Mutex<Seen>,
}

impl RecentPosts {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            seen: Mutex::new(Seen::default()),
        }
    }
}

impl PostDeliveryGuard for RecentPosts {
    fn first_delivery(&self, post_id: &str, action_id: &str) -> bool {
        let key = (post_id.to_owned(), action_id.to_owned());
        let mut seen = self.seen.lock().unwrap_or_else(|e| e.into_inner());
        if seen.keys.contains(&key) {
            return false;
        }
        if seen.order.len() == self.capacity {
            if let Some(oldest) = seen.order.pop_front() {
                seen.keys.remove(&oldest);
            }
        }
        seen.keys.insert(key.clone());
        seen.order.push_back(key);
        true
    }
}
