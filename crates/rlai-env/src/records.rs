//! Episode tables consumed by the plotting scripts.
//!
//! Every table is an uncompressed Parquet file. Column names and types are
//! fixed: coordinates are `UInt64`, rewards `Float64`.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use arrow_array::{Array, ArrayRef, Float64Array, RecordBatch, UInt64Array};
use arrow_schema::{Field, Schema};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use rlai_core::TransitionStep;

use crate::error::{RecordError, RecordResult};
use crate::grid_world::Cell;

/// One row per step: the cell the agent acted from and the reward it got
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeStep {
    /// Column of the cell the step started from
    pub episode_x: u64,
    /// Row of the cell the step started from
    pub episode_y: u64,
    /// Reward collected by the step
    pub reward: f64,
}

impl From<&TransitionStep<Cell>> for EpisodeStep {
    fn from(step: &TransitionStep<Cell>) -> Self {
        let (x, y) = step.state.0;
        Self {
            episode_x: x as u64,
            episode_y: y as u64,
            reward: step.reward,
        }
    }
}

/// One row per episode: how many steps it took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeLength {
    /// Number of steps
    pub length: u64,
}

/// Convert a simulated episode into step rows
pub fn episode_steps(steps: &[TransitionStep<Cell>]) -> Vec<EpisodeStep> {
    steps.iter().map(EpisodeStep::from).collect()
}

fn table(columns: Vec<(&str, ArrayRef)>) -> RecordResult<RecordBatch> {
    let fields: Vec<Field> = columns
        .iter()
        .map(|(name, array)| Field::new(*name, array.data_type().clone(), false))
        .collect();
    let arrays = columns.into_iter().map(|(_, array)| array).collect();
    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
}

fn cell_columns<'a>(
    names: (&'static str, &'static str),
    cells: impl Iterator<Item = &'a Cell>,
) -> [(&'static str, ArrayRef); 2] {
    let (xs, ys): (Vec<u64>, Vec<u64>) = cells.map(|&(x, y)| (x as u64, y as u64)).unzip();
    [
        (names.0, Arc::new(UInt64Array::from(xs)) as ArrayRef),
        (names.1, Arc::new(UInt64Array::from(ys)) as ArrayRef),
    ]
}

/// `episode_x`, `episode_y`, `reward`
pub fn steps_table(rows: &[EpisodeStep]) -> RecordResult<RecordBatch> {
    let xs: Vec<u64> = rows.iter().map(|row| row.episode_x).collect();
    let ys: Vec<u64> = rows.iter().map(|row| row.episode_y).collect();
    let rewards: Vec<f64> = rows.iter().map(|row| row.reward).collect();
    table(vec![
        ("episode_x", Arc::new(UInt64Array::from(xs)) as ArrayRef),
        ("episode_y", Arc::new(UInt64Array::from(ys)) as ArrayRef),
        ("reward", Arc::new(Float64Array::from(rewards)) as ArrayRef),
    ])
}

/// `length`
pub fn lengths_table(rows: &[EpisodeLength]) -> RecordResult<RecordBatch> {
    let lengths: Vec<u64> = rows.iter().map(|row| row.length).collect();
    let lengths = Arc::new(UInt64Array::from(lengths)) as ArrayRef;
    table(vec![("length", lengths)])
}

/// `goal_x`, `goal_y`, repeated once per episode
pub fn goal_table(goal: Cell, episodes: usize) -> RecordResult<RecordBatch> {
    let goals = vec![goal; episodes];
    let columns = cell_columns(("goal_x", "goal_y"), goals.iter());
    table(columns.into())
}

/// `terminal_x`, `terminal_y`, one row per pit
pub fn terminal_table(pits: &[Cell]) -> RecordResult<RecordBatch> {
    let columns = cell_columns(("terminal_x", "terminal_y"), pits.iter());
    table(columns.into())
}

/// Write one table as an uncompressed Parquet stream
pub fn write_parquet<W>(writer: W, batch: &RecordBatch) -> RecordResult<()>
where
    W: Write + Send,
{
    let props = WriterProperties::builder()
        .set_compression(Compression::UNCOMPRESSED)
        .build();
    let mut writer = ArrowWriter::try_new(writer, batch.schema(), Some(props))?;
    writer.write(batch)?;
    writer.close()?;
    Ok(())
}

/// Read every batch stored in a Parquet file
pub fn read_parquet(path: &Path) -> RecordResult<Vec<RecordBatch>> {
    let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(path)?)?.build()?;
    let batches = reader.collect::<Result<Vec<_>, _>>()?;
    Ok(batches)
}

fn column<'a, T>(batch: &'a RecordBatch, name: &'static str) -> RecordResult<&'a T>
where
    T: Array + 'static,
{
    batch
        .column_by_name(name)
        .and_then(|array| array.as_any().downcast_ref::<T>())
        .ok_or(RecordError::Column(name))
}

/// Decode step rows from a table written by [`steps_table`]
pub fn steps_from_table(batch: &RecordBatch) -> RecordResult<Vec<EpisodeStep>> {
    let xs = column::<UInt64Array>(batch, "episode_x")?;
    let ys = column::<UInt64Array>(batch, "episode_y")?;
    let rewards = column::<Float64Array>(batch, "reward")?;
    Ok((0..batch.num_rows())
        .map(|i| EpisodeStep {
            episode_x: xs.value(i),
            episode_y: ys.value(i),
            reward: rewards.value(i),
        })
        .collect())
}

/// Decode length rows from a table written by [`lengths_table`]
pub fn lengths_from_table(batch: &RecordBatch) -> RecordResult<Vec<EpisodeLength>> {
    let lengths = column::<UInt64Array>(batch, "length")?;
    Ok(lengths
        .values()
        .iter()
        .map(|&length| EpisodeLength { length })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow_schema::DataType;
    use rlai_core::{NonTerminal, State};

    fn two_steps() -> Vec<TransitionStep<Cell>> {
        vec![
            TransitionStep {
                state: NonTerminal((0, 0)),
                next_state: State::NonTerminal((0, 1)),
                reward: 0.0,
            },
            TransitionStep {
                state: NonTerminal((0, 1)),
                next_state: State::Terminal((1, 1)),
                reward: -1.0,
            },
        ]
    }

    #[test]
    fn test_steps_table_columns() {
        let batch = steps_table(&episode_steps(&two_steps())).unwrap();
        let schema = batch.schema();

        assert_eq!(batch.num_rows(), 2);
        assert_eq!(schema.field(0).name(), "episode_x");
        assert_eq!(schema.field(0).data_type(), &DataType::UInt64);
        assert_eq!(schema.field(1).name(), "episode_y");
        assert_eq!(schema.field(1).data_type(), &DataType::UInt64);
        assert_eq!(schema.field(2).name(), "reward");
        assert_eq!(schema.field(2).data_type(), &DataType::Float64);
    }

    #[test]
    fn test_steps_survive_parquet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("first.parquet");
        let rows = episode_steps(&two_steps());

        let batch = steps_table(&rows).unwrap();
        write_parquet(File::create(&path).unwrap(), &batch).unwrap();
        let batches = read_parquet(&path).unwrap();

        let read: Vec<EpisodeStep> = batches
            .iter()
            .flat_map(|batch| steps_from_table(batch).unwrap())
            .collect();
        assert_eq!(read, rows);
    }

    #[test]
    fn test_lengths_survive_parquet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("length.parquet");
        let rows = [EpisodeLength { length: 3 }, EpisodeLength { length: 12 }];

        let batch = lengths_table(&rows).unwrap();
        write_parquet(File::create(&path).unwrap(), &batch).unwrap();
        let batches = read_parquet(&path).unwrap();

        assert_eq!(batches[0].schema().field(0).data_type(), &DataType::UInt64);
        assert_eq!(lengths_from_table(&batches[0]).unwrap(), rows);
    }

    #[test]
    fn test_layout_tables() {
        let goal = goal_table((4, 3), 3).unwrap();
        assert_eq!(goal.num_rows(), 3);
        let goal_x = column::<UInt64Array>(&goal, "goal_x").unwrap();
        assert!(goal_x.values().iter().all(|&x| x == 4));

        let pits = terminal_table(&[(1, 0), (3, 4)]).unwrap();
        let terminal_y = column::<UInt64Array>(&pits, "terminal_y").unwrap();
        assert_eq!(terminal_y.values().to_vec(), vec![0, 4]);
    }

    #[test]
    fn test_missing_column_is_reported() {
        let lengths = lengths_table(&[EpisodeLength { length: 1 }]).unwrap();
        assert!(matches!(
            steps_from_table(&lengths),
            Err(RecordError::Column("episode_x"))
        ));
    }
}
