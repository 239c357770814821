use bytes::{Buf, BufMut};

const LOG_MAGIC: [u8; 4] = *b"RVML";
const LOG_FORMAT_VERSION: u32 = 1;
const LOG_HEADER_SIZE: usize = 8;

//One post-image appended at commit and replayed into the segment file at recovery.
//Framing: u32 name length, name bytes, u32 offset, u32 payload size, payload.
//All integers are little endian regardless of the host
pub struct LogRecord {
    pub segment_name: String,
    pub offset: usize,
    pub data: Vec<u8>,
}

impl LogRecord {
    pub fn serialize(&self) -> Vec<u8> {
        let mut serialized: Vec<u8> = Vec::new();
        serialized.put_u32_le(self.segment_name.len() as u32);
        serialized.extend(self.segment_name.as_bytes());
        serialized.put_u32_le(self.offset as u32);
        serialized.put_u32_le(self.data.len() as u32);
        serialized.extend(&self.data);
        serialized
    }

    //None means a short or undecodable record, the truncated tail a crash mid commit leaves behind
    pub fn deserialize(current_ptr: &mut &[u8]) -> Option<LogRecord> {
        if current_ptr.remaining() < 4 {
            return None;
        }
        let name_length = current_ptr.get_u32_le() as usize;
        if current_ptr.remaining() < name_length {
            return None;
        }
        let segment_name = String::from_utf8(current_ptr[..name_length].to_vec()).ok()?;
        current_ptr.advance(name_length);

        if current_ptr.remaining() < 8 {
            return None;
        }
        let offset = current_ptr.get_u32_le() as usize;
        let size = current_ptr.get_u32_le() as usize;
        if current_ptr.remaining() < size {
            return None;
        }
        let data = current_ptr[..size].to_vec();
        current_ptr.advance(size);

        Some(LogRecord {
            segment_name,
            offset,
            data,
        })
    }
}

pub fn serialize_log_header() -> Vec<u8> {
    let mut serialized: Vec<u8> = Vec::new();
    serialized.extend(LOG_MAGIC);
    serialized.put_u32_le(LOG_FORMAT_VERSION);
    serialized
}

//Consumes the header. False when it is short or does not match, in which
//case the file cannot contain valid records
pub fn check_log_header(current_ptr: &mut &[u8]) -> bool {
    if current_ptr.remaining() < LOG_HEADER_SIZE {
        return false;
    }
    if current_ptr[..4] != LOG_MAGIC {
        return false;
    }
    current_ptr.advance(4);
    current_ptr.get_u32_le() == LOG_FORMAT_VERSION
}

#[cfg(test)]
mod test {
    use crate::wal::log_record::{check_log_header, serialize_log_header, LogRecord};

    #[test]
    fn record_serialize_deserialize() {
        let record = LogRecord {
            segment_name: String::from("testseg"),
            offset: 128,
            data: vec![1, 2, 3, 4],
        };
        let serialized = record.serialize();

        let mut current_ptr = serialized.as_slice();
        let deserialized = LogRecord::deserialize(&mut current_ptr).unwrap();

        assert_eq!(deserialized.segment_name, "testseg");
        assert_eq!(deserialized.offset, 128);
        assert_eq!(deserialized.data, vec![1, 2, 3, 4]);
        assert_eq!(current_ptr.len(), 0);
    }

    #[test]
    fn decodes_records_in_sequence() {
        let mut serialized = Vec::new();
        serialized.extend(LogRecord { segment_name: String::from("a"), offset: 0, data: vec![9] }.serialize());
        serialized.extend(LogRecord { segment_name: String::from("b"), offset: 7, data: vec![8, 8] }.serialize());

        let mut current_ptr = serialized.as_slice();
        assert_eq!(LogRecord::deserialize(&mut current_ptr).unwrap().segment_name, "a");
        assert_eq!(LogRecord::deserialize(&mut current_ptr).unwrap().segment_name, "b");
        assert!(LogRecord::deserialize(&mut current_ptr).is_none());
    }

    #[test]
    fn truncated_record_is_dropped() {
        let record = LogRecord {
            segment_name: String::from("testseg"),
            offset: 0,
            data: vec![1, 2, 3, 4, 5, 6, 7, 8],
        };
        let serialized = record.serialize();

        //Cut anywhere, the decoder must refuse the tail instead of panicking
        for cut in 0..serialized.len() {
            let mut current_ptr = &serialized[..cut];
            assert!(LogRecord::deserialize(&mut current_ptr).is_none());
        }
    }

    #[test]
    fn header_round_trip() {
        let header = serialize_log_header();

        let mut current_ptr = header.as_slice();
        assert!(check_log_header(&mut current_ptr));
        assert_eq!(current_ptr.len(), 0);

        let mut wrong_magic = header.clone();
        wrong_magic[0] = b'X';
        assert!(!check_log_header(&mut wrong_magic.as_slice()));

        assert!(!check_log_header(&mut &header[..4]));
    }
}
