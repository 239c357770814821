use crate::segments::segment::SegmentId;

pub type TransId = usize;

//Pre-image of one contiguous range of one segment, captured by about_to_modify.
//On abort the payload is copied back into the image, on commit the range is
//re-read from the image and its post-image goes to the log
pub struct UndoRecord {
    pub(crate) segment_name: String,
    pub(crate) offset: usize,
    pub(crate) data: Vec<u8>,
}

pub struct Transaction {
    pub(crate) trans_id: TransId,
    pub(crate) segment_ids: Vec<SegmentId>,
    pub(crate) undo_records: Vec<UndoRecord>,
}

impl Transaction {
    pub fn create(trans_id: TransId, segment_ids: Vec<SegmentId>) -> Transaction {
        Transaction {
            undo_records: Vec::new(),
            segment_ids,
            trans_id,
        }
    }

    pub fn holds_segment(&self, segment_id: SegmentId) -> bool {
        self.segment_ids.contains(&segment_id)
    }

    pub fn add_undo_record(&mut self, segment_name: &str, offset: usize, data: Vec<u8>) {
        self.undo_records.push(UndoRecord {
            segment_name: String::from(segment_name),
            offset,
            data,
        });
    }
}
