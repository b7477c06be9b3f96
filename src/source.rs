use std::fs::File;
use std::io;

/// A random-access source of bytes.
///
/// Reads are positioned: `read_at` neither depends on nor disturbs any
/// current position, so a single source can serve any number of concurrent
/// decode calls without locking.
pub trait ByteSource {
	/// Read exactly `buf.len()` bytes starting at `offset`.
	///
	/// Fails with [`io::ErrorKind::UnexpectedEof`] if the source ends before
	/// the buffer is filled.
	fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<()>;
}

impl ByteSource for [u8] {
	fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
		let start = usize::try_from(offset).map_err(|_| io::Error::from(io::ErrorKind::UnexpectedEof))?;
		let end = start
			.checked_add(buf.len())
			.filter(|&end| end <= self.len())
			.ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))?;
		buf.copy_from_slice(&self[start..end]);
		Ok(())
	}
}

impl ByteSource for Vec<u8> {
	fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
		self.as_slice().read_at(offset, buf)
	}
}

#[cfg(unix)]
impl ByteSource for File {
	fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
		std::os::unix::fs::FileExt::read_exact_at(self, buf, offset)
	}
}

#[cfg(windows)]
impl ByteSource for File {
	fn read_at(&self, mut offset: u64, mut buf: &mut [u8]) -> io::Result<()> {
		use std::os::windows::fs::FileExt;

		while !buf.is_empty() {
			match self.seek_read(buf, offset) {
				Ok(0) => return Err(io::ErrorKind::UnexpectedEof.into()),
				Ok(n) => {
					offset += n as u64;
					let rest = buf;
					buf = &mut rest[n..];
				}
				Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
				Err(e) => return Err(e),
			}
		}
		Ok(())
	}
}

impl<S: ByteSource + ?Sized> ByteSource for &S {
	fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
		(**self).read_at(offset, buf)
	}
}
