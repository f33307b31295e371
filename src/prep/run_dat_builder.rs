use workflow::{Block, Group, RunSpec, SubtaskKey};

/// Utility for building the contents of a subtask's `run.dat` file.
/// Note that it modifies a String reference held internally;
/// read that String to get the file's contents.
#[derive(Debug)]
pub struct RunDatBuilder<'a> {
    strbuf: &'a mut String,
}

impl<'a> RunDatBuilder<'a> {
    pub fn new(strbuf: &'a mut String) -> Self {
        Self { strbuf }
    }
}

impl RunDatBuilder<'_> {
    /// Write a run.dat with the input block, the blocks the group is split along,
    /// and a task block holding just `task_line`.
    /// The split block is narrowed to the single `key`, unless it's [SubtaskKey::All].
    pub fn write_subtask(&mut self, run: &RunSpec, group: Group, task_line: &str, key: &SubtaskKey) {
        self.strbuf.clear();
        let task_block = group.task_type.block();
        for block in Block::ALL {
            match block {
                Block::Input => self.write_block(block, run.get(block)),
                Block::Spc | Block::Pes => match group.key_block() {
                    Some(key_block) if key_block == block => match key.block_content() {
                        Some(content) => self.write_block(block, &content),
                        None => self.write_block(block, run.get(block)),
                    },
                    Some(_) => (),
                    // unsplit groups keep all species and reactions:
                    None => self.write_block(block, run.get(block)),
                },
                _ if block == task_block => self.write_block(block, task_line),
                _ => (),
            }
        }
    }

    /// keyword line, re-indented content, and end line
    fn write_block(&mut self, block: Block, content: &str) {
        let keyword = block.keyword();
        self.strbuf.push_str(keyword);
        self.strbuf.push('\n');
        self.strbuf.push_str(&syntax::format_block(content));
        self.strbuf.push_str("\nend ");
        self.strbuf.push_str(keyword);
        self.strbuf.push_str("\n\n");
    }
}
