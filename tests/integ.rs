use anyhow::Result;
use clap::Parser;
use mechsplit::{App, Args, Dispatch, DispatchCall, Settings};
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};
use workflow::{RunManifest, SubtaskKey, Task};

const RUN_DAT: &str = "
input
    inp_mech = chemkin
    run_prefix = run
    save_prefix = save
end input

spc
    1-3
end spc

pes
    1: 1-2
end pes

els
    spc  init_geom   runlvl=lvl_wbs  inplvl=lvl_wbs
    spc  conf_samp   runlvl=lvl_wbs  inplvl=lvl_wbs  cnf_range=n50
    ts   find_ts     runlvl=lvl_wbs  inplvl=lvl_wbs
end els

thermo
    write_mess  kin_model=global
end thermo

kin
    run_mess
end kin
";

const THEORY_DAT: &str = "
level lvl_wbs
    orb_res = RU
    program = gaussian09
    method = wb97xd
    basis = 6-31g*
    mem = 4
    nprocs = 8
end level
";

const SPECIES_CSV: &str = "\
name,smiles,inchi,mult,charge
CH4,'C','InChI=1S/CH4/h1H4',1,0
C5H12,'CCCCC','InChI=1S/C5H12/c1-3-5-4-2/h3-5H2,1-2H3',1,0
H2O,'O','InChI=1S/H2O/h1H2',1,0
";

struct Job {
    job: TempDir,
    output: TempDir,
    fs_root: TempDir,
}

impl Job {
    fn new() -> Result<Self> {
        let job = tempdir()?;
        let inp = job.path().join("inp");
        std::fs::create_dir(&inp)?;
        std::fs::write(inp.join("run.dat"), RUN_DAT)?;
        std::fs::write(inp.join("theory.dat"), THEORY_DAT)?;
        std::fs::write(inp.join("models.dat"), "kin\nend kin\n")?;
        std::fs::write(inp.join("mechanism.dat"), "REACTIONS\nEND\n")?;
        std::fs::write(inp.join("species.csv"), SPECIES_CSV)?;
        Ok(Self {
            job,
            output: tempdir()?,
            fs_root: tempdir()?,
        })
    }

    fn output(&self) -> PathBuf {
        self.output.path().canonicalize().expect("output dir exists")
    }

    fn setup(&self, extra: &[&str]) -> Result<()> {
        let mut args = vec![
            "mechsplit".to_owned(),
            "setup".to_owned(),
            "-p".to_owned(),
            stringify(self.job.path()),
            "-o".to_owned(),
            stringify(self.output.path()),
            "-s".to_owned(),
            stringify(&self.fs_root.path().join("save")),
            "-r".to_owned(),
            stringify(&self.fs_root.path().join("run")),
        ];
        args.extend(extra.iter().map(|arg| arg.to_string()));
        run_args(args)
    }

    fn read(&self, rel: &str) -> Result<String> {
        Ok(std::fs::read_to_string(self.output().join(rel))?)
    }
}

fn stringify(path: &Path) -> String {
    path.to_str().unwrap().to_owned()
}

fn run_args(args: Vec<String>) -> Result<()> {
    let settings: Settings = Args::try_parse_from(args)?.try_into()?;
    App::new(settings).run()
}

#[derive(Default)]
struct Recorder {
    calls: Vec<DispatchCall>,
}

impl Dispatch for Recorder {
    fn dispatch(&mut self, call: &DispatchCall) -> Result<()> {
        self.calls.push(call.clone());
        Ok(())
    }
}

#[test]
fn test_setup_layout() -> Result<()> {
    let job = Job::new()?;
    job.setup(&[])?;
    let out = job.output();

    for gid in 0..4 {
        assert!(out.join(format!("{gid}.yaml")).is_file(), "task list {gid} exists");
        assert!(out.join(format!("{gid}.csv")).is_file(), "subtask table {gid} exists");
    }

    let tasks: Vec<Task> = serde_yaml::from_str(&job.read("0.yaml")?)?;
    assert_eq!(2, tasks.len());
    assert_eq!("conf_samp", tasks[1].name);
    assert_eq!(Some(4), tasks[1].mem);
    assert_eq!(Some(8), tasks[1].nprocs);
    assert_eq!(
        vec![SubtaskKey::Species(1), SubtaskKey::Species(2), SubtaskKey::Species(3)],
        tasks[1].subtask_keys
    );
    assert_eq!(vec![1, 20, 1], tasks[1].subtask_nworkers);
    assert_eq!(vec![1, 1, 1], tasks[0].subtask_nworkers);

    let csv = job.read("0.csv")?;
    let mut lines = csv.lines();
    assert_eq!(Some("task,01,02,03"), lines.next());
    let expected = format!(
        "init_geom,{0}/0_00_init_geom/01,{0}/0_00_init_geom/02,{0}/0_00_init_geom/03",
        out.display()
    );
    assert_eq!(Some(expected.as_str()), lines.next());

    let pes_csv = job.read("1.csv")?;
    assert!(pes_csv.starts_with("task,01_01,01_02\n"));
    let kin_csv = job.read("3.csv")?;
    assert!(kin_csv.starts_with("task,all\n"));

    let subtask = out.join("0_01_conf_samp").join("02").join("inp");
    for name in ["theory.dat", "models.dat", "mechanism.dat", "species.csv"] {
        let copied = std::fs::read_to_string(subtask.join(name))?;
        let original = std::fs::read_to_string(job.job.path().join("inp").join(name))?;
        assert_eq!(original, copied, "{name} is copied unchanged");
    }
    let run_dat = std::fs::read_to_string(subtask.join("run.dat"))?;
    assert!(run_dat.starts_with("input\n"));
    assert!(run_dat.contains("\nspc\n    2\nend spc\n"));
    assert!(run_dat.contains("conf_samp"));
    assert!(!run_dat.contains("init_geom"));
    assert!(!run_dat.contains("inp_mech"));
    let save = job.fs_root.path().join("save");
    assert!(run_dat.contains(&format!("save_prefix = {}", save.display())));

    let manifest: RunManifest = serde_yaml::from_str(&job.read("info.yaml")?)?;
    assert_eq!(vec![0, 1, 2, 3], manifest.group_ids);
    assert_eq!(save, manifest.save_path);
    assert_eq!(std::env::current_dir()?, manifest.work_path);
    Ok(())
}

#[test]
fn test_setup_default_roots() -> Result<()> {
    let job = Job::new()?;
    run_args(vec![
        "mechsplit".to_owned(),
        "setup".to_owned(),
        "-p".to_owned(),
        stringify(job.job.path()),
        "-o".to_owned(),
        stringify(job.output.path()),
        "-g".to_owned(),
        "kin".to_owned(),
    ])?;

    // relative prefixes in run.dat resolve against the working directory:
    let cwd = std::env::current_dir()?;
    let run_dat = job.read("0_00_run_mess/all/inp/run.dat")?;
    assert!(run_dat.contains(&format!("run_prefix = {}", cwd.join("run").display())));
    assert!(run_dat.contains(&format!("save_prefix = {}", cwd.join("save").display())));

    let manifest: RunManifest = serde_yaml::from_str(&job.read("info.yaml")?)?;
    assert_eq!(vec![0], manifest.group_ids);
    assert_eq!(cwd.join("run"), manifest.run_path);
    assert_eq!(cwd.join("save"), manifest.save_path);
    assert_eq!(cwd, manifest.work_path);
    Ok(())
}

#[test]
fn test_setup_is_deterministic() -> Result<()> {
    let job = Job::new()?;
    job.setup(&["-g", "els.pes"])?;
    let first = job.read("0_00_find_ts/01_02/inp/run.dat")?;
    let first_csv = job.read("0.csv")?;
    job.setup(&["-g", "els.pes"])?;
    assert_eq!(first, job.read("0_00_find_ts/01_02/inp/run.dat")?);
    assert_eq!(first_csv, job.read("0.csv")?);
    assert!(first.contains("\npes\n    1: 2\nend pes\n"));
    Ok(())
}

#[test]
fn test_missing_input_file() -> Result<()> {
    let job = Job::new()?;
    std::fs::remove_file(job.job.path().join("inp").join("models.dat"))?;
    let err = job.setup(&[]).unwrap_err();
    assert!(format!("{err:?}").contains("models.dat"));
    assert!(!job.output().join("info.yaml").exists(), "nothing written");
    Ok(())
}

#[test]
fn test_bad_task_writes_nothing() -> Result<()> {
    let job = Job::new()?;
    let run_dat = RUN_DAT.replace("init_geom   runlvl=lvl_wbs", "init_geom   runlvl=lvl_x");
    std::fs::write(job.job.path().join("inp").join("run.dat"), run_dat)?;
    assert!(job.setup(&[]).is_err());
    assert!(!job.output().join("0.yaml").exists(), "no group was written");
    Ok(())
}

#[test]
fn test_run_adhoc() -> Result<()> {
    let job = Job::new()?;
    job.setup(&[])?;
    let out = job.output();

    let args = Args::try_parse_from([
        "mechsplit",
        "run-adhoc",
        "-p",
        stringify(&out).as_str(),
        "-n",
        "n1,n2",
    ])?;
    let settings: Settings = args.try_into()?;
    let mut recorder = Recorder::default();
    App::new(settings).run_adhoc_with(&mut recorder)?;

    // only the first group is dispatched:
    assert_eq!(2, recorder.calls.len());
    let call = &recorder.calls[1];
    assert_eq!(22, call.paths.len());
    assert_eq!(
        format!("{}/0_01_conf_samp/02", out.display()),
        call.paths[1]
    );
    assert_eq!(call.paths[1], call.paths[20]);
    assert_eq!("out19.log", call.logs[20]);
    assert_eq!("out0.log", call.logs[21]);
    assert_eq!(Some(4), call.mem);
    assert_eq!(Some("n1,n2"), call.nodes.as_deref());
    assert_eq!(None, call.activation_hook);

    assert!(job.fs_root.path().join("run").is_dir(), "run filesystem created");
    assert!(job.fs_root.path().join("save").is_dir(), "save filesystem created");
    Ok(())
}

#[test]
fn test_run_adhoc_without_setup() -> Result<()> {
    let empty = tempdir()?;
    let args = Args::try_parse_from(["mechsplit", "run-adhoc", "-p", stringify(empty.path()).as_str()])?;
    let settings: Settings = args.try_into()?;
    let mut recorder = Recorder::default();
    assert!(App::new(settings).run_adhoc_with(&mut recorder).is_err());
    assert!(recorder.calls.is_empty());
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_run_adhoc_script() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let job = Job::new()?;
    job.setup(&["-g", "kin"])?;

    let script = job.fs_root.path().join("dispatch.sh");
    let record = job.fs_root.path().join("args.txt");
    std::fs::write(
        &script,
        format!("#!/bin/sh\nprintf '%s|' \"$@\" >> {}\n", record.display()),
    )?;
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))?;

    run_args(vec![
        "mechsplit".to_owned(),
        "run-adhoc".to_owned(),
        "-p".to_owned(),
        stringify(job.output.path()),
        "--script".to_owned(),
        stringify(&script),
    ])?;

    let recorded = std::fs::read_to_string(&record)?;
    let expected = format!(
        "{}|||{}/0_00_run_mess/all|out0.log|||",
        std::env::current_dir()?.display(),
        job.output().display()
    );
    assert_eq!(expected, recorded);
    Ok(())
}
