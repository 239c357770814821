use crate::segments::segment::SegmentId;
use crate::transactions::transaction::{TransId, Transaction};
use std::collections::{HashMap, VecDeque};

//Transaction ids come from a monotonically increasing counter plus a FIFO
//free list. Ids released on commit/abort go to the tail and are reused in
//order, the counter only advances when the free list is empty
pub struct TransactionManager {
    active_transactions: HashMap<TransId, Transaction>,
    free_trans_ids: VecDeque<TransId>,
    next_trans_id: TransId,
}

impl TransactionManager {
    pub fn create() -> TransactionManager {
        TransactionManager {
            active_transactions: HashMap::new(),
            free_trans_ids: VecDeque::new(),
            next_trans_id: 0,
        }
    }

    pub fn begin(&mut self, segment_ids: Vec<SegmentId>) -> TransId {
        let trans_id = self.acquire_trans_id();
        self.active_transactions.insert(trans_id, Transaction::create(trans_id, segment_ids));
        trans_id
    }

    pub fn get_mut(&mut self, trans_id: TransId) -> Option<&mut Transaction> {
        self.active_transactions.get_mut(&trans_id)
    }

    //Removes the transaction without releasing its id. Commit/abort release
    //the id once the transaction's segments have been unlocked
    pub fn take(&mut self, trans_id: TransId) -> Option<Transaction> {
        self.active_transactions.remove(&trans_id)
    }

    pub fn is_active(&self, trans_id: TransId) -> bool {
        self.active_transactions.contains_key(&trans_id)
    }

    pub fn release_trans_id(&mut self, trans_id: TransId) {
        self.free_trans_ids.push_back(trans_id);
    }

    fn acquire_trans_id(&mut self) -> TransId {
        match self.free_trans_ids.pop_front() {
            Some(trans_id) => trans_id,
            None => {
                let trans_id = self.next_trans_id;
                self.next_trans_id = self.next_trans_id + 1;
                trans_id
            }
        }
    }
}

#[cfg(test)]
mod test {
    use crate::transactions::transaction_manager::TransactionManager;

    #[test]
    fn fresh_ids_are_sequential() {
        let mut manager = TransactionManager::create();
        assert_eq!(manager.begin(vec![]), 0);
        assert_eq!(manager.begin(vec![]), 1);
        assert_eq!(manager.begin(vec![]), 2);

        assert!(manager.is_active(0));
        assert!(manager.is_active(2));
        assert!(!manager.is_active(3));
    }

    #[test]
    fn released_ids_are_reused_in_fifo_order() {
        let mut manager = TransactionManager::create();
        let t0 = manager.begin(vec![]);
        let t1 = manager.begin(vec![]);

        manager.take(t1).unwrap();
        manager.release_trans_id(t1);
        manager.take(t0).unwrap();
        manager.release_trans_id(t0);

        assert_eq!(manager.begin(vec![]), t1);
        assert_eq!(manager.begin(vec![]), t0);
        assert_eq!(manager.begin(vec![]), 2);
    }

    #[test]
    fn undo_records_keep_insertion_order() {
        let mut manager = TransactionManager::create();
        let trans_id = manager.begin(vec![7]);

        let transaction = manager.get_mut(trans_id).unwrap();
        assert!(transaction.holds_segment(7));
        assert!(!transaction.holds_segment(8));

        transaction.add_undo_record("a", 0, vec![1]);
        transaction.add_undo_record("a", 5, vec![2]);

        let transaction = manager.take(trans_id).unwrap();
        assert_eq!(transaction.undo_records[0].offset, 0);
        assert_eq!(transaction.undo_records[1].offset, 5);
        assert!(!manager.is_active(trans_id));
    }
}
