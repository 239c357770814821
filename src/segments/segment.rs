pub type SegmentId = usize;

//A named byte region with an in-memory image, persisted as one file in the backing directory
pub struct Segment {
    pub(crate) segment_id: SegmentId,
    pub(crate) name: String,
    pub(crate) data: Vec<u8>,
    pub(crate) locked: bool,
}

impl Segment {
    pub fn create(segment_id: SegmentId, name: &str, size: usize) -> Segment {
        Segment {
            name: String::from(name),
            data: vec![0; size],
            locked: false,
            segment_id,
        }
    }

    //Segments only ever grow. New bytes are zero filled
    pub fn grow(&mut self, new_size: usize) {
        if new_size > self.data.len() {
            self.data.resize(new_size, 0);
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod test {
    use crate::segments::segment::Segment;

    #[test]
    fn create_and_grow() {
        let mut segment = Segment::create(0, "testseg", 4);
        assert_eq!(segment.size(), 4);
        assert_eq!(segment.data, vec![0, 0, 0, 0]);

        segment.data.copy_from_slice(&[1, 2, 3, 4]);
        segment.grow(6);
        assert_eq!(segment.data, vec![1, 2, 3, 4, 0, 0]);

        segment.grow(2);
        assert_eq!(segment.size(), 6);
    }
}
