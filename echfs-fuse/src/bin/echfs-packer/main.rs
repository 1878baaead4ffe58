mod cli;

use std::fs;
use std::io;
use std::path::Path;

use clap::Parser;
use cli::Cli;
use echfs_fuse::ImageBuilder;

fn main() -> io::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    println!("source={:?}\nout={:?}", cli.source, cli.out);

    let mut builder = ImageBuilder::new(cli.blocks, cli.block_size, cli.dir_blocks)
        .expect("bad volume geometry");
    import_dir(&mut builder, ImageBuilder::ROOT, &cli.source)?;

    fs::write(&cli.out, builder.build())?;

    Ok(())
}

fn import_dir(builder: &mut ImageBuilder, parent: u64, dir: &Path) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry
            .file_name()
            .into_string()
            .expect("file name isn't valid UTF-8");

        if entry.file_type()?.is_dir() {
            log::info!("dir: {:?}", entry.path());
            let id = builder.mkdir(parent, &name);
            import_dir(builder, id, &entry.path())?;
        } else {
            log::info!("file: {:?}", entry.path());
            builder.add_file(parent, &name, &fs::read(entry.path())?);
        }
    }

    Ok(())
}
