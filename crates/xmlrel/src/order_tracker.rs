use xmlrel_core::{DocumentMut, NodeId};

/// Position of a child among its siblings, as read back from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// No order information. The child goes after every ordered sibling.
    None,

    /// Children with smaller values come first.
    Value(i64),
}

/// Places the children of one element so that ordered children are sorted
/// by their order value, followed by unordered children in arrival order.
///
/// Children arrive from several sources (the class row, property tables,
/// related class tables), each sorted on its own. Insertion scans for the
/// first sibling with a strictly greater value, so equal values keep their
/// arrival order. Child result sets are read in descending order, which
/// makes each scan stop at the front.
///
/// The tracker assumes every child of `parent` is inserted through it.
#[derive(Debug)]
pub struct OrderTracker {
    parent: NodeId,

    /// Order values of the ordered children, in document order.
    ordered: Vec<i64>,

    /// Number of unordered children, which follow the ordered ones.
    unordered: usize,
}

impl OrderTracker {
    pub fn new(parent: NodeId) -> OrderTracker {
        OrderTracker {
            parent,
            ordered: vec![],
            unordered: 0,
        }
    }

    pub fn parent(&self) -> NodeId {
        self.parent
    }

    /// Attaches `child` to the tracked parent at the position `order` calls
    /// for.
    pub fn insert(&mut self, doc: &mut impl DocumentMut, child: NodeId, order: Order) {
        match order {
            Order::None => {
                doc.append_child(self.parent, child);
                self.unordered += 1;
            }
            Order::Value(value) => {
                let index = self
                    .ordered
                    .iter()
                    .position(|existing| *existing > value)
                    .unwrap_or(self.ordered.len());

                self.ordered.insert(index, value);
                doc.insert_child(self.parent, index, child);
            }
        }
    }

    /// Forgets every child seen so far.
    pub fn clear(&mut self) {
        self.ordered.clear();
        self.unordered = 0;
    }

    pub fn len(&self) -> usize {
        self.ordered.len() + self.unordered
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
